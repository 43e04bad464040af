//! HostGate Core - Host-whitelisted reverse proxy components
//!
//! This crate provides the request pipeline for a whitelisting proxy:
//! - Per-client rate limiting with a sliding window algorithm
//! - Hostname syntax validation
//! - Wildcard host whitelist compiled into anchored patterns
//! - Hop-by-hop and identity header sanitization
//! - Timeout-bounded forwarding over HTTPS with streamed responses
//!
//! # Overview
//!
//! `hostgate-core` is framework-agnostic above the transport: the binary
//! crate owns sockets and configuration parsing, hands each request to
//! [`handle_request`], and gets back a complete response. All settings
//! arrive as plain values in [`ProxySettings`], fixed at startup; the only
//! shared mutable state is the [`RateLimiter`] map.
//!
//! # Example
//!
//! ```rust
//! use hostgate_core::{RateLimiter, Whitelist};
//!
//! let whitelist = Whitelist::compile(&["api.github.com", "*.openai.com"])?;
//! assert!(whitelist.is_allowed("API.GITHUB.COM"));
//! assert!(whitelist.is_allowed("api.openai.com"));
//! assert!(!whitelist.is_allowed("evil.example"));
//!
//! // One limiter is shared by every connection task.
//! let limiter = RateLimiter::new();
//! # Ok::<(), hostgate_core::HostGateError>(())
//! ```
//!
//! # Modules
//!
//! - [`types`] - Configuration values and shared rate limiter state
//! - [`error`] - Error types and result alias
//! - [`defaults`] - Default configuration values
//! - [`hostname`] - Hostname syntax validation
//! - [`whitelist`] - Wildcard pattern compilation and matching
//! - [`rate_limiter`] - Sliding-window admission
//! - [`headers`] - Header sanitization for both directions
//! - [`request_handler`] - The admission pipeline and upstream forwarding

#![forbid(unsafe_code)]

pub mod defaults;
pub mod error;
pub mod headers;
pub mod hostname;
pub mod rate_limiter;
pub mod request_handler;
#[cfg(test)]
pub mod test_utils;
pub mod types;
pub mod whitelist;

// Re-export commonly used items at crate root
pub use error::{HostGateError, Result};
pub use headers::{sanitize_request_headers, sanitize_response_headers};
pub use hostname::is_valid_hostname;
pub use rate_limiter::check_rate_limit;
pub use request_handler::{
    // Pipeline decision types
    Decision,
    ForwardPlan,
    ProxyBody,
    // Pipeline stages and helpers
    admit,
    build_http_client,
    build_target_url,
    create_error_response,
    handle_request,
};
pub use types::{
    // Configuration structs
    ProxySettings,
    RateLimitConfig,
    // Rate limiting types
    RateLimiter,
    RateWindow,
    UpstreamConfig,
};
pub use whitelist::{HostPattern, Whitelist};
