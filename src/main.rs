use catalog_search::config::{Config, LogFormat, McpTransport};
use catalog_search::handlers;
use catalog_search::mcp;
use catalog_search::state::AppState;
use catalog_search::telemetry::{NoopRecorder, PrometheusRecorder, SearchRecorder};

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(LogFormat::from_env());

    tracing::info!("Starting catalog search service");

    // Load configuration
    let config = Config::from_env()?;
    let shutdown_timeout = config.shutdown_timeout_secs;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Prometheus scrape endpoint on its own listener
    let recorder: Arc<dyn SearchRecorder> = if config.enable_metrics {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
        PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()
            .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;
        tracing::info!(address = %metrics_addr, "Metrics listener started");
        Arc::new(PrometheusRecorder)
    } else {
        Arc::new(NoopRecorder)
    };

    // Build the upstream client before accepting calls
    let state = Arc::new(AppState::new(config.search, recorder));
    state.start().await?;

    match config.mcp_transport {
        McpTransport::Stdio => {
            mcp::serve_stdio(state.tools.clone()).await?;
        }
        McpTransport::Http => {
            let app = handlers::router(Arc::clone(&state))
                .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

            let listener = TcpListener::bind(addr).await?;
            tracing::info!(address = %addr, "Server listening");

            // Run server with graceful shutdown
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
                .await?;
        }
    }

    state.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Logs go to stderr so stdout stays free for tool output.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalog_search=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
/// After signal, allows `timeout_secs` for in-flight calls to complete.
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }

    // Give in-flight calls time to complete
    tracing::info!(timeout_secs, "Draining connections...");
    tokio::time::sleep(Duration::from_secs(timeout_secs)).await;
}
