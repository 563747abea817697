use crate::search::params::{default_rows, SearchRequest};
use crate::telemetry::ToolOutcome;
use crate::tools::{CatalogTool, CatalogTools};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;

/// Arguments of the single-category tools.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct PageArgs {
    #[schemars(description = "Search terms, matched against titles and descriptions")]
    pub query: String,
    #[serde(default)]
    #[schemars(description = "Offset of the first result (default 0)")]
    pub start: i64,
    #[serde(default = "default_rows")]
    #[schemars(description = "Results per page, at most 50 (default 10)")]
    pub rows: i64,
}

impl From<PageArgs> for SearchRequest {
    fn from(args: PageArgs) -> Self {
        SearchRequest::new(args.query).page(args.start, args.rows)
    }
}

#[derive(Clone)]
pub struct CatalogToolService {
    tools: CatalogTools,
    tool_router: ToolRouter<CatalogToolService>,
}

#[tool_router]
impl CatalogToolService {
    pub fn new(tools: CatalogTools) -> Self {
        Self {
            tools,
            tool_router: Self::tool_router(),
        }
    }

    async fn reply(&self, tool: CatalogTool, request: SearchRequest) -> CallToolResult {
        match self.tools.call(tool, request).await {
            ToolOutcome::Success(text) => CallToolResult::success(vec![Content::text(text)]),
            ToolOutcome::Failure(text) => CallToolResult::error(vec![Content::text(text)]),
        }
    }

    #[tool(
        description = "Search for certified software and applications in the ecosystem catalog."
    )]
    async fn search_certified_software(
        &self,
        Parameters(args): Parameters<PageArgs>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(self.reply(CatalogTool::CertifiedSoftware, args.into()).await)
    }

    #[tool(
        description = "Search for container repositories and product listings, with repository, \
                       tag and architecture details."
    )]
    async fn search_container_repositories(
        &self,
        Parameters(args): Parameters<PageArgs>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(self.reply(CatalogTool::ContainerRepositories, args.into()).await)
    }

    #[tool(
        description = "Search for business partners and consulting firms, with industry and \
                       accreditation details."
    )]
    async fn search_business_partners(
        &self,
        Parameters(args): Parameters<PageArgs>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(self.reply(CatalogTool::BusinessPartners, args.into()).await)
    }

    #[tool(description = "Search for certified hardware systems and components.")]
    async fn search_certified_hardware(
        &self,
        Parameters(args): Parameters<PageArgs>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(self.reply(CatalogTool::CertifiedHardware, args.into()).await)
    }

    #[tool(description = "Search for cloud solutions, cloud images and cloud instance types.")]
    async fn search_cloud_solutions(
        &self,
        Parameters(args): Parameters<PageArgs>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(self.reply(CatalogTool::CloudSolutions, args.into()).await)
    }

    #[tool(
        description = "Search across every catalog type with document kind and partner facets. \
                       Accepts an optional document_kinds filter."
    )]
    async fn general_catalog_search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        Ok(self.reply(CatalogTool::GeneralCatalog, request).await)
    }
}

#[tool_handler]
impl ServerHandler for CatalogToolService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Ecosystem Catalog Search".to_string()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Search the ecosystem catalog. Use a category tool when the kind of item is \
                 known, otherwise general_catalog_search. Results are paged with start and \
                 rows (at most 50)."
                    .to_string(),
            ),
        }
    }
}
