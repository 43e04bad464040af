//! Error types for HostGate.
//!
//! Centralized error handling using `thiserror`. Configuration errors are
//! fatal at startup, before the server binds. Per-request errors are
//! converted to HTTP responses at the pipeline boundary and never terminate
//! the process; the response body carries [`user_message`] while the full
//! cause goes to the log.
//!
//! [`user_message`]: HostGateError::user_message

use hyper::StatusCode;
use thiserror::Error;

/// All errors produced by HostGate.
#[derive(Debug, Error)]
pub enum HostGateError {
    /// A whitelist pattern contains more wildcards than allowed.
    #[error("whitelist pattern '{pattern}' contains {count} wildcards (maximum {max})")]
    TooManyWildcards {
        pattern: String,
        count: usize,
        max: usize,
    },

    /// A whitelist pattern did not compile into a matcher.
    #[error("whitelist pattern '{pattern}' is invalid: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// No whitelist patterns were configured.
    #[error("no allowed host patterns configured")]
    EmptyWhitelist,

    /// The upstream call did not complete within the configured timeout.
    #[error("upstream request to '{host}' timed out after {timeout_ms}ms")]
    UpstreamTimeout { host: String, timeout_ms: u64 },

    /// The upstream call failed in transport (DNS, connect, TLS, protocol).
    #[error("upstream request to '{host}' failed: {source}")]
    UpstreamFailed {
        host: String,
        #[source]
        source: reqwest::Error,
    },
}

impl HostGateError {
    /// Returns the HTTP status code sent to the client for this error.
    ///
    /// Configuration errors abort startup and never reach a client; they
    /// map to 500 so a misrouted one is still visible.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::UpstreamFailed { .. } => StatusCode::BAD_GATEWAY,
            Self::TooManyWildcards { .. } | Self::InvalidPattern { .. } | Self::EmptyWhitelist => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the message sent to the client.
    ///
    /// Names the target host (and the timeout budget for 504) but never the
    /// underlying transport error; that detail belongs in the log only.
    pub fn user_message(&self) -> String {
        match self {
            Self::UpstreamTimeout { host, timeout_ms } => {
                format!("Upstream request to '{host}' timed out after {timeout_ms}ms")
            }
            Self::UpstreamFailed { host, .. } => {
                format!("Upstream request to '{host}' failed")
            }
            Self::TooManyWildcards { .. } | Self::InvalidPattern { .. } | Self::EmptyWhitelist => {
                "Internal server error".to_string()
            }
        }
    }

    /// True when the error should be logged at error level rather than
    /// warning level.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

/// Convenience result type for HostGate operations.
pub type Result<T> = std::result::Result<T, HostGateError>;
