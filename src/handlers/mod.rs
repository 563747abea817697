pub mod health;

pub use health::{health_handler, ready_handler};

use crate::mcp;
use crate::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Health routes plus the MCP service under `/mcp`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .nest_service("/mcp", mcp::http_service(state.tools.clone()))
        .with_state(state)
}
