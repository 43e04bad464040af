//! Environment variable names used throughout HostGate configuration

/// Whitelist configuration
pub const ALLOWED_HOSTS: &str = "ALLOWED_HOSTS";

/// Rate limiting configuration
pub const RATE_LIMIT_REQUESTS: &str = "RATE_LIMIT_REQUESTS";
pub const RATE_LIMIT_WINDOW_MS: &str = "RATE_LIMIT_WINDOW_MS";

/// Proxy behavior configuration
pub const PROXY_TIMEOUT_MS: &str = "PROXY_TIMEOUT_MS";

/// Get all environment variable names for documentation/validation
pub fn all_env_vars() -> &'static [&'static str] {
    &[
        ALLOWED_HOSTS,
        RATE_LIMIT_REQUESTS,
        RATE_LIMIT_WINDOW_MS,
        PROXY_TIMEOUT_MS,
    ]
}
