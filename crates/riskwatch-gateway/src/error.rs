//! # Design
//!
//! - One error type for every gateway call, whether it is a one-off action or a poll.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use std::io;

use thiserror::Error;

/// Result alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure talking to the backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The HTTP client could not be constructed.
    #[error("failed to build http client")]
    ClientBuild {
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// The endpoint could not be resolved against the base URL.
    #[error("invalid endpoint")]
    InvalidEndpoint {
        /// Endpoint path that failed to resolve.
        endpoint: String,
        /// Source URL error.
        source: url::ParseError,
    },
    /// The request never produced a response (connection refused, timeout, ...).
    #[error("http transport failed")]
    Transport {
        /// Endpoint path used for the request.
        endpoint: String,
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// The backend answered with a non-success status.
    #[error("http response status error")]
    Http {
        /// Endpoint path used for the request.
        endpoint: String,
        /// HTTP status code returned by the server.
        status: u16,
        /// Response body, trimmed.
        body: String,
    },
    /// The response body was not the expected JSON shape.
    #[error("failed to parse response body")]
    Parse {
        /// Endpoint path used for the request.
        endpoint: String,
        /// Source serde error.
        source: serde_json::Error,
    },
    /// Writing a downloaded body to its destination failed.
    #[error("failed to write response body")]
    Write {
        /// Endpoint path used for the request.
        endpoint: String,
        /// Source IO error.
        source: io::Error,
    },
}

impl GatewayError {
    pub(crate) fn invalid_endpoint(endpoint: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            source,
        }
    }

    pub(crate) fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    pub(crate) fn parse(endpoint: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Endpoint path the failure relates to, if any.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::ClientBuild { .. } => None,
            Self::InvalidEndpoint { endpoint, .. }
            | Self::Transport { endpoint, .. }
            | Self::Http { endpoint, .. }
            | Self::Parse { endpoint, .. }
            | Self::Write { endpoint, .. } => Some(endpoint),
        }
    }

    /// HTTP status, when the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` when no response was received at all.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Single human-readable line combining the message with its context.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::ClientBuild { source } => format!("{self}: {source}"),
            Self::InvalidEndpoint { endpoint, source } => format!("{self} {endpoint}: {source}"),
            Self::Transport { endpoint, source } => format!("{self} for {endpoint}: {source}"),
            Self::Http {
                endpoint,
                status,
                body,
            } if body.is_empty() => format!("{self} for {endpoint} (status {status})"),
            Self::Http {
                endpoint,
                status,
                body,
            } => format!("{self} for {endpoint} (status {status}): {body}"),
            Self::Parse { endpoint, source } => format!("{self} from {endpoint}: {source}"),
            Self::Write { endpoint, source } => format!("{self} from {endpoint}: {source}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn http_error_detail_includes_status_and_body() {
        let err = GatewayError::Http {
            endpoint: "/alerts".to_string(),
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "http response status error");
        assert_eq!(
            err.detail(),
            "http response status error for /alerts (status 503): maintenance"
        );
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.endpoint(), Some("/alerts"));
        assert!(!err.is_transport());
    }

    #[test]
    fn parse_error_keeps_source() {
        let Err(source) = serde_json::from_str::<serde_json::Value>("{") else {
            panic!("expected invalid json");
        };
        let err = GatewayError::parse("/entities", source);
        assert!(err.source().is_some());
        assert!(err.detail().starts_with("failed to parse response body from /entities"));
    }

    #[test]
    fn invalid_endpoint_reports_path() {
        let err = GatewayError::invalid_endpoint("/x", url::ParseError::EmptyHost);
        assert_eq!(err.endpoint(), Some("/x"));
        assert_eq!(err.status(), None);
    }
}
