//! Catalog search - ecosystem catalog tools over a remote search endpoint
//!
//! This library exposes the query builder, search executor, report
//! formatter and the six catalog tools, so they can be embedded or driven
//! from integration tests without the MCP surface.

pub mod config;
pub mod error;
pub mod handlers;
pub mod mcp;
pub mod report;
pub mod search;
pub mod state;
pub mod telemetry;
pub mod tools;

// Re-export key types for convenience
pub use config::{Config, SearchConfig};
pub use error::TransportError;
pub use handlers::{health_handler, ready_handler};
pub use mcp::CatalogToolService;
pub use search::{QueryBuilder, SearchParameters, SearchRequest, SearchResponse, SearchService};
pub use state::AppState;
pub use telemetry::{NoopRecorder, PrometheusRecorder, SearchRecorder};
pub use tools::{CatalogTool, CatalogTools};
