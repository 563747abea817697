use std::env;
use std::time::Duration;

/// Default upstream search endpoint.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://access.redhat.com/hydra/rest/search/kcs";

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// How MCP clients reach the tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McpTransport {
    /// JSON-RPC over stdin/stdout.
    Stdio,
    /// Streamable HTTP under `/mcp`, next to the health routes.
    Http,
}

impl McpTransport {
    /// `stdio`, or any of `http` / `streamable-http` / `sse` (the default).
    pub fn from_env() -> Self {
        match env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "stdio" => Self::Stdio,
            _ => Self::Http,
        }
    }
}

impl LogFormat {
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Settings for the upstream HTTP client.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub endpoint: String,
    /// Total per-request timeout (connect + response).
    pub timeout: Duration,
    /// Upper bound on in-flight upstream requests.
    pub max_connections: usize,
    /// Idle connections kept open for reuse.
    pub max_idle_connections: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
            max_connections: 10,
            max_idle_connections: 5,
        }
    }
}

impl SearchConfig {
    /// Same defaults, pointed at another endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}

pub struct Config {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
    pub mcp_transport: McpTransport,
    /// Install the Prometheus recorder and its scrape listener.
    pub enable_metrics: bool,
    /// Port of the Prometheus scrape listener.
    pub metrics_port: u16,
    pub search: SearchConfig,
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            shutdown_timeout_secs: env::var("SHUTDOWN_TIMEOUT")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,
            enable_metrics: env::var("ENABLE_METRICS")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            mcp_transport: McpTransport::from_env(),
            metrics_port: env::var("METRICS_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()?,
            search: SearchConfig {
                endpoint: env::var("SEARCH_ENDPOINT")
                    .unwrap_or_else(|_| DEFAULT_SEARCH_ENDPOINT.to_string()),
                timeout: Duration::from_secs(
                    env::var("SEARCH_TIMEOUT_SECS")
                        .unwrap_or_else(|_| "30".to_string())
                        .parse()?,
                ),
                max_connections: env::var("SEARCH_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
                max_idle_connections: env::var("SEARCH_MAX_IDLE_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
            },
        })
    }
}
