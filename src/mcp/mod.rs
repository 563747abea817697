//! MCP surface for the catalog tools.
//!
//! The same [`CatalogToolService`] is served either over stdio or as a
//! streamable HTTP service nested under `/mcp`.

pub mod tools;

use crate::tools::CatalogTools;
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use rmcp::ServiceExt as _;
pub use tools::{CatalogToolService, PageArgs};

/// Streamable HTTP service; every session gets its own handler over the
/// shared tools.
pub fn http_service(
    tools: CatalogTools,
) -> StreamableHttpService<CatalogToolService, LocalSessionManager> {
    let factory = move || Ok(CatalogToolService::new(tools.clone()));
    StreamableHttpService::new(
        factory,
        LocalSessionManager::default().into(),
        Default::default(),
    )
}

/// Serve over stdin/stdout until the client disconnects.
pub async fn serve_stdio(tools: CatalogTools) -> anyhow::Result<()> {
    tracing::info!("Serving catalog tools over stdio");

    let service = CatalogToolService::new(tools)
        .serve(rmcp::transport::stdio())
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "MCP stdio serving error"))?;

    service.waiting().await?;
    Ok(())
}
