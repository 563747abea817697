//! Upstream search executor.
//!
//! [`SearchService`] owns one pooled `reqwest` client, built on first use
//! (or by [`SearchService::start`]) and shared by every call until
//! [`SearchService::close`]. In-flight requests are bounded by a semaphore
//! sized to the configured connection limit, and the configured timeout
//! covers the wait for a slot as well as the request itself.

use crate::config::SearchConfig;
use crate::error::TransportError;
use crate::search::params::SearchParameters;
use crate::search::response::SearchResponse;
use crate::telemetry::{SearchRecorder, SearchTimer};
use reqwest::Url;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore, SemaphorePermit};

/// Pooled client plus its concurrency limit.
struct Transport {
    http: reqwest::Client,
    permits: Semaphore,
    active: AtomicUsize,
}

impl Transport {
    fn connect(config: &SearchConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .https_only(config.endpoint.starts_with("https://"))
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.max_idle_connections)
            .build()
            .map_err(|e| TransportError::unexpected(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            permits: Semaphore::new(config.max_connections.max(1)),
            active: AtomicUsize::new(0),
        })
    }

    async fn acquire<'a>(
        &'a self,
        recorder: &'a dyn SearchRecorder,
    ) -> Result<ActiveCall<'a>, TransportError> {
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| TransportError::network("search client is closed"))?;
        recorder.record_active_connections(self.active.fetch_add(1, Ordering::SeqCst) + 1);
        Ok(ActiveCall {
            _permit: permit,
            transport: self,
            recorder,
        })
    }
}

/// A held connection slot. Releasing it updates the in-flight count.
struct ActiveCall<'a> {
    _permit: SemaphorePermit<'a>,
    transport: &'a Transport,
    recorder: &'a dyn SearchRecorder,
}

impl Drop for ActiveCall<'_> {
    fn drop(&mut self) {
        let remaining = self.transport.active.fetch_sub(1, Ordering::SeqCst) - 1;
        self.recorder.record_active_connections(remaining);
    }
}

/// Upstream slot lifecycle.
enum Slot {
    Idle,
    Open(Arc<Transport>),
    Closed,
}

pub struct SearchService {
    config: SearchConfig,
    recorder: Arc<dyn SearchRecorder>,
    slot: Mutex<Slot>,
}

impl SearchService {
    pub fn new(config: SearchConfig, recorder: Arc<dyn SearchRecorder>) -> Self {
        Self {
            config,
            recorder,
            slot: Mutex::new(Slot::Idle),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Build the pooled client now instead of on the first search.
    pub async fn start(&self) -> Result<(), TransportError> {
        self.transport().await.map(|_| ())
    }

    /// True once the client exists and has not been closed.
    pub async fn is_open(&self) -> bool {
        matches!(*self.slot.lock().await, Slot::Open(_))
    }

    /// Drop the pooled client and refuse further searches.
    ///
    /// Calls already holding the client finish normally; the sockets are
    /// released when the last of them completes.
    pub async fn close(&self) {
        let mut slot = self.slot.lock().await;
        if let Slot::Open(transport) = std::mem::replace(&mut *slot, Slot::Closed) {
            transport.permits.close();
            tracing::info!(endpoint = %self.config.endpoint, "Search client closed");
        }
    }

    async fn transport(&self) -> Result<Arc<Transport>, TransportError> {
        let mut slot = self.slot.lock().await;
        match &*slot {
            Slot::Open(transport) => Ok(Arc::clone(transport)),
            Slot::Closed => Err(TransportError::network("search client is closed")),
            Slot::Idle => {
                let transport = Arc::new(Transport::connect(&self.config)?);
                tracing::debug!(
                    endpoint = %self.config.endpoint,
                    timeout_secs = self.config.timeout.as_secs(),
                    max_connections = self.config.max_connections,
                    max_idle = self.config.max_idle_connections,
                    "Search client initialized"
                );
                *slot = Slot::Open(Arc::clone(&transport));
                Ok(transport)
            }
        }
    }

    /// Full request URL for `params`.
    pub fn request_url(&self, params: &SearchParameters) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.config.endpoint).map_err(|e| {
            TransportError::unexpected(format!(
                "invalid search endpoint {}: {e}",
                self.config.endpoint
            ))
        })?;
        url.query_pairs_mut().extend_pairs(params.to_pairs());
        Ok(url)
    }

    /// Run one search. Duration and outcome are recorded on every path.
    pub async fn execute(
        &self,
        params: &SearchParameters,
    ) -> Result<SearchResponse, TransportError> {
        let mut timer = SearchTimer::start(Arc::clone(&self.recorder));

        let transport = self.transport().await?;
        let url = self.request_url(params)?;

        let parsed = tokio::time::timeout(self.config.timeout, self.fetch(&transport, url))
            .await
            .map_err(|_| {
                tracing::error!(
                    timeout_secs = self.config.timeout.as_secs(),
                    "Search request timed out"
                );
                TransportError::timed_out(self.config.timeout)
            })??;

        timer.succeed();
        tracing::debug!(
            num_found = parsed.num_found(),
            docs = parsed.docs().len(),
            "Search request completed"
        );
        Ok(parsed)
    }

    /// Wait for a slot, send, and decode the body.
    async fn fetch(
        &self,
        transport: &Transport,
        url: Url,
    ) -> Result<SearchResponse, TransportError> {
        let _call = transport.acquire(self.recorder.as_ref()).await?;

        let response = transport.http.get(url).send().await.map_err(|e| {
            let err = TransportError::from(e);
            tracing::error!(error = %err, "Request error during search");
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "HTTP error during search request");
            return Err(TransportError::Status {
                code: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            let err = TransportError::from(e);
            tracing::error!(error = %err, "Failed to read search response body");
            err
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(error = %e, "Malformed search response");
            TransportError::unexpected(format!("invalid response body: {e}"))
        })
    }
}
