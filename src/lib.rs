//! HostGate - A whitelisting gate for outbound HTTP
//!
//! A reverse proxy that reads the target host from the first path segment,
//! checks it against a configured whitelist, and forwards the request over
//! HTTPS with the response streamed back.
//!
//! # Overview
//!
//! HostGate provides:
//! - Host whitelisting with bounded wildcard patterns
//! - Hostname syntax validation before any outbound use
//! - Per-client rate limiting with a sliding window algorithm
//! - Hop-by-hop and identity header sanitization in both directions
//! - Timeout-bounded upstream calls with streamed bodies
//! - Structured logging with JSON support
//!
//! # Example
//!
//! ```rust,no_run
//! use hostgate::{config, RateLimiter, Whitelist};
//!
//! // Get configuration from environment
//! let settings = config::get_proxy_settings();
//! let whitelist = Whitelist::compile(config::get_allowed_host_patterns())?;
//!
//! // Create a rate limiter shared by all connection tasks
//! let limiter = RateLimiter::new();
//! # Ok::<(), hostgate::HostGateError>(())
//! ```
//!
//! # Modules
//!
//! - [`config`] - Configuration management from environment variables
//! - [`env_vars`] - Environment variable constants
//! - [`server`] - Server utilities and startup info
//! - [`args`] - Command line argument parsing
//! - [`connection`] - Connection limiting
//!
//! # Re-exports from hostgate-core
//!
//! Core functionality is provided by the `hostgate-core` crate:
//! - [`whitelist`] - Wildcard pattern compilation and matching
//! - [`hostname`] - Hostname syntax validation
//! - [`rate_limiter`] - Rate limiting implementation
//! - [`headers`] - Header sanitization for both directions
//! - [`request_handler`] - HTTP request processing and forwarding

#![forbid(unsafe_code)]

pub mod args;
pub mod config;
pub mod connection;
pub mod env_vars;
pub mod server;

// Re-export hostgate-core modules
pub use hostgate_core::headers;
pub use hostgate_core::hostname;
pub use hostgate_core::rate_limiter;
pub use hostgate_core::request_handler;
pub use hostgate_core::types;
pub use hostgate_core::whitelist;

// Re-export commonly used items at crate root
pub use config::{get_allowed_host_patterns, get_proxy_settings};
pub use hostgate_core::{
    // Errors
    HostGateError,
    // Response body type
    ProxyBody,
    // Configuration structs
    ProxySettings,
    RateLimitConfig,
    // Rate limiting types
    RateLimiter,
    UpstreamConfig,
    // Whitelist types
    Whitelist,
    build_http_client,
    handle_request,
};
