//! Catalog tool calls.
//!
//! Every call is total: upstream failures come back as text starting with
//! the tool's error prefix, never as an `Err`.

use crate::report;
use crate::search::{QueryBuilder, SearchRequest, SearchService};
use crate::telemetry::{instrument, SearchRecorder, ToolOutcome};
use crate::tools::policy::CatalogTool;
use std::sync::Arc;

#[derive(Clone)]
pub struct CatalogTools {
    service: Arc<SearchService>,
    recorder: Arc<dyn SearchRecorder>,
    builder: Arc<QueryBuilder>,
}

impl CatalogTools {
    pub fn new(service: Arc<SearchService>, recorder: Arc<dyn SearchRecorder>) -> Self {
        Self {
            service,
            recorder,
            builder: Arc::new(QueryBuilder::default()),
        }
    }

    pub fn service(&self) -> &Arc<SearchService> {
        &self.service
    }

    /// Run `tool`, recording tool usage. Failures are reported, not raised.
    pub async fn call(&self, tool: CatalogTool, request: SearchRequest) -> ToolOutcome {
        instrument(tool.name(), self.recorder.as_ref(), self.run(tool, &request)).await
    }

    /// Run `tool` and return its report text.
    pub async fn invoke(&self, tool: CatalogTool, request: SearchRequest) -> String {
        self.call(tool, request).await.into_text()
    }

    async fn run(&self, tool: CatalogTool, request: &SearchRequest) -> ToolOutcome {
        tracing::info!(tool = tool.name(), query = %request.query, "Tool invoked");

        let kinds = if tool.accepts_kind_filter() {
            request.document_kinds.as_deref()
        } else {
            None
        };
        let params = self.builder.build(tool.filters(), request, kinds);

        match self.service.execute(&params).await {
            Ok(response) => {
                ToolOutcome::Success(report::render(&response, tool.label(), tool.enrichment()))
            }
            Err(e) => {
                tracing::error!(
                    tool = tool.name(),
                    error = %e,
                    kind = e.kind(),
                    "Tool call failed"
                );
                ToolOutcome::Failure(format!("{}: {}", tool.failure_prefix(), e))
            }
        }
    }

    pub async fn search_certified_software(&self, query: &str, start: i64, rows: i64) -> String {
        self.invoke(
            CatalogTool::CertifiedSoftware,
            SearchRequest::new(query).page(start, rows),
        )
        .await
    }

    pub async fn search_container_repositories(
        &self,
        query: &str,
        start: i64,
        rows: i64,
    ) -> String {
        self.invoke(
            CatalogTool::ContainerRepositories,
            SearchRequest::new(query).page(start, rows),
        )
        .await
    }

    pub async fn search_business_partners(&self, query: &str, start: i64, rows: i64) -> String {
        self.invoke(
            CatalogTool::BusinessPartners,
            SearchRequest::new(query).page(start, rows),
        )
        .await
    }

    pub async fn search_certified_hardware(&self, query: &str, start: i64, rows: i64) -> String {
        self.invoke(
            CatalogTool::CertifiedHardware,
            SearchRequest::new(query).page(start, rows),
        )
        .await
    }

    pub async fn search_cloud_solutions(&self, query: &str, start: i64, rows: i64) -> String {
        self.invoke(
            CatalogTool::CloudSolutions,
            SearchRequest::new(query).page(start, rows),
        )
        .await
    }

    pub async fn general_catalog_search(
        &self,
        query: &str,
        start: i64,
        rows: i64,
        document_kinds: Option<Vec<String>>,
    ) -> String {
        let mut request = SearchRequest::new(query).page(start, rows);
        request.document_kinds = document_kinds;
        self.invoke(CatalogTool::GeneralCatalog, request).await
    }
}
