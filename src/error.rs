use std::error::Error as _;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single upstream search call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Upstream answered with a non-2xx status.
    #[error("Search request failed with status {code}")]
    Status { code: u16 },

    /// Connection refused, DNS failure, timeout, or a broken body stream.
    #[error("Search request failed: {detail}")]
    Network { detail: String },

    /// Malformed payload or anything else unforeseen.
    #[error("Unexpected search failure: {detail}")]
    Unexpected { detail: String },
}

impl TransportError {
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network {
            detail: detail.into(),
        }
    }

    pub fn unexpected(detail: impl Into<String>) -> Self {
        Self::Unexpected {
            detail: detail.into(),
        }
    }

    pub fn timed_out(limit: Duration) -> Self {
        Self::network(format!("search request timed out after {limit:?}"))
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::Network { .. } => "network",
            Self::Unexpected { .. } => "unexpected",
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Status {
                code: status.as_u16(),
            };
        }

        // The request URL carries the whole parameter set; keep it out of
        // messages that end up in tool replies.
        let err = err.without_url();
        let mut detail = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            detail.push_str(": ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }

        if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
            Self::network(detail)
        } else {
            Self::unexpected(detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_contains_code() {
        let err = TransportError::Status { code: 503 };
        assert_eq!(err.to_string(), "Search request failed with status 503");
        assert_eq!(err.kind(), "status");
    }

    #[test]
    fn test_network_and_unexpected_messages() {
        assert_eq!(
            TransportError::network("connection refused").to_string(),
            "Search request failed: connection refused"
        );
        assert_eq!(
            TransportError::unexpected("expected value at line 1").to_string(),
            "Unexpected search failure: expected value at line 1"
        );
    }

    #[test]
    fn test_timeout_is_network() {
        let err = TransportError::timed_out(Duration::from_secs(30));
        assert_eq!(err.kind(), "network");
        assert_eq!(
            err.to_string(),
            "Search request failed: search request timed out after 30s"
        );
    }
}
