use crate::config::SearchConfig;
use crate::error::TransportError;
use crate::search::SearchService;
use crate::telemetry::SearchRecorder;
use crate::tools::CatalogTools;
use std::sync::Arc;

/// Application state shared across all request handlers.
pub struct AppState {
    pub tools: CatalogTools,
}

impl AppState {
    /// Build the search service and bind the tools to it.
    ///
    /// The upstream client is not created here; call [`AppState::start`]
    /// to build it eagerly, otherwise the first search does.
    pub fn new(search: SearchConfig, recorder: Arc<dyn SearchRecorder>) -> Self {
        let service = Arc::new(SearchService::new(search, Arc::clone(&recorder)));
        Self {
            tools: CatalogTools::new(service, recorder),
        }
    }

    /// Build the pooled upstream client.
    pub async fn start(&self) -> Result<(), TransportError> {
        let service = self.tools.service();
        service.start().await?;
        tracing::info!(endpoint = %service.config().endpoint, "Search service started");
        Ok(())
    }

    /// Release the upstream connection pool.
    pub async fn close(&self) {
        self.tools.service().close().await;
    }

    /// Ready while the upstream client exists and has not been closed.
    pub async fn is_ready(&self) -> bool {
        self.tools.service().is_open().await
    }
}
