//! Search and tool-call metrics.
//!
//! The core only talks to [`SearchRecorder`]. The Prometheus-backed
//! implementation goes through the `metrics` facade, so it is a no-op until
//! a recorder is installed at startup.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Receives one event per upstream search and per tool call.
///
/// Implementations must be cheap and must not panic.
pub trait SearchRecorder: Send + Sync {
    fn record_search(&self, started: Instant, success: bool);

    fn record_tool_usage(&self, tool: &str, started: Instant, success: bool);

    /// Upstream requests currently holding a connection slot.
    fn record_active_connections(&self, count: usize);
}

/// Publishes through the global `metrics` recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrometheusRecorder;

impl SearchRecorder for PrometheusRecorder {
    fn record_search(&self, started: Instant, success: bool) {
        let status = if success { "success" } else { "error" };
        metrics::counter!("catalog_search_requests_total", "status" => status).increment(1);
        metrics::histogram!("catalog_search_duration_seconds")
            .record(started.elapsed().as_secs_f64());
    }

    fn record_tool_usage(&self, tool: &str, started: Instant, success: bool) {
        let status = if success { "success" } else { "error" };
        metrics::counter!(
            "catalog_tool_calls_total",
            "tool" => tool.to_string(),
            "status" => status
        )
        .increment(1);
        metrics::histogram!("catalog_tool_duration_seconds", "tool" => tool.to_string())
            .record(started.elapsed().as_secs_f64());
    }

    fn record_active_connections(&self, count: usize) {
        metrics::gauge!("catalog_search_active_connections").set(count as f64);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl SearchRecorder for NoopRecorder {
    fn record_search(&self, _started: Instant, _success: bool) {}

    fn record_tool_usage(&self, _tool: &str, _started: Instant, _success: bool) {}

    fn record_active_connections(&self, _count: usize) {}
}

/// Records one upstream search when dropped.
///
/// The outcome is a failure unless [`SearchTimer::succeed`] was called, so
/// early returns and cancelled futures are still counted.
pub struct SearchTimer {
    recorder: Arc<dyn SearchRecorder>,
    started: Instant,
    success: bool,
}

impl SearchTimer {
    pub fn start(recorder: Arc<dyn SearchRecorder>) -> Self {
        Self {
            recorder,
            started: Instant::now(),
            success: false,
        }
    }

    pub fn succeed(&mut self) {
        self.success = true;
    }
}

impl Drop for SearchTimer {
    fn drop(&mut self) {
        self.recorder.record_search(self.started, self.success);
    }
}

/// Outcome of a tool call. Both arms carry the text returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Success(String),
    Failure(String),
}

impl ToolOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Success(text) | Self::Failure(text) => text,
        }
    }
}

/// Records one tool call when dropped; a failure unless marked otherwise.
struct ToolTimer<'a> {
    tool: &'a str,
    recorder: &'a dyn SearchRecorder,
    started: Instant,
    success: bool,
}

impl Drop for ToolTimer<'_> {
    fn drop(&mut self) {
        self.recorder
            .record_tool_usage(self.tool, self.started, self.success);
    }
}

/// Run a tool call and record its duration and outcome under `tool`.
///
/// A call dropped before completion is recorded as a failure.
pub async fn instrument<F>(tool: &str, recorder: &dyn SearchRecorder, call: F) -> ToolOutcome
where
    F: Future<Output = ToolOutcome>,
{
    let mut timer = ToolTimer {
        tool,
        recorder,
        started: Instant::now(),
        success: false,
    };
    let outcome = call.await;
    timer.success = outcome.is_success();
    outcome
}
