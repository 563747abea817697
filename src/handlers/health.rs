//! Liveness and readiness.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Readiness {
    pub ready: bool,
    /// Upstream search endpoint the tools query.
    pub upstream: String,
}

/// GET /health
pub async fn health_handler() -> Json<Liveness> {
    Json(Liveness {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /ready - 503 until the upstream client is built, and again after close.
pub async fn ready_handler(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Readiness>) {
    let ready = state.is_ready().await;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let upstream = state.tools.service().config().endpoint.clone();
    (status, Json(Readiness { ready, upstream }))
}
