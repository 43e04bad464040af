//! Default configuration values for HostGate.
//!
//! This module centralizes all default values used throughout HostGate,
//! ensuring consistency between production code and tests.

use std::time::Duration;

/// Default maximum requests per rate limit window.
pub const RATE_LIMIT_REQUESTS: u32 = 100;

/// Default rate limit window in milliseconds.
pub const RATE_LIMIT_WINDOW_MS: u64 = 60_000;

/// Default rate limit window duration.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_millis(RATE_LIMIT_WINDOW_MS);

/// Default upstream timeout in milliseconds.
pub const PROXY_TIMEOUT_MS: u64 = 30_000;

/// Default upstream timeout duration.
pub const PROXY_TIMEOUT: Duration = Duration::from_millis(PROXY_TIMEOUT_MS);

/// Maximum number of `*` wildcards allowed in one whitelist pattern.
pub const MAX_PATTERN_WILDCARDS: usize = 3;

/// Maximum redirects followed on a forwarded request.
pub const MAX_REDIRECTS: usize = 10;

/// Default maximum concurrent connections.
pub const MAX_CONNECTIONS: usize = 10_000;

/// Value of the `x-proxied-by` marker added to proxied responses.
pub const PROXIED_BY: &str = "hostgate";
