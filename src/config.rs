//! Configuration management for HostGate.
//!
//! This module handles loading and caching configuration from environment
//! variables. All configurations are computed once at first access and cached
//! for the lifetime of the application using `once_cell::sync::Lazy`.
//!
//! # Caching
//!
//! Configuration values are read from environment variables only once, at
//! startup. This provides:
//! - Consistent configuration throughout the application lifetime
//! - No runtime overhead from repeated environment lookups
//! - Thread-safe access without locking
//!
//! # Example
//!
//! ```
//! use hostgate::config;
//!
//! // Get cached configuration
//! let settings = config::get_proxy_settings();
//! println!("Max requests: {}", settings.rate_limit.max_requests);
//! println!("Timeout: {}ms", settings.upstream.timeout_ms());
//! ```

use std::env;
use std::str::FromStr;
use std::time::Duration;

use once_cell::sync::Lazy;
use tracing::warn;

use crate::env_vars;
use hostgate_core::defaults;
use hostgate_core::{ProxySettings, RateLimitConfig, UpstreamConfig};

// ============================================================================
// Cached Configuration (computed once at first access)
// ============================================================================

static RATE_LIMIT_CONFIG: Lazy<RateLimitConfig> = Lazy::new(compute_rate_limit_config);
static UPSTREAM_CONFIG: Lazy<UpstreamConfig> = Lazy::new(compute_upstream_config);
static ALLOWED_HOST_PATTERNS: Lazy<Vec<String>> =
    Lazy::new(|| compute_allowed_host_patterns_internal(|key| std::env::var(key)));

// ============================================================================
// Internal Helpers
// ============================================================================

/// Parses an environment variable with fallback to a default value.
///
/// Logs a warning if the value exists but cannot be parsed.
fn parse_env_var_or_default<T>(var_name: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(var_name) {
        Ok(value) => match value.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(var = var_name, value = %value, "Invalid env var value, using default");
                default
            }
        },
        Err(_) => default,
    }
}

/// Parses a comma-separated string into a Vec of trimmed strings.
///
/// Filters out empty entries after trimming.
///
/// # Arguments
///
/// * `input` - The comma-separated string to parse
///
/// # Returns
///
/// A Vec of non-empty, trimmed strings
fn parse_comma_separated(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ============================================================================
// Public Configuration Getters
// ============================================================================

/// Returns the cached pipeline settings.
///
/// Configuration is read from environment variables on first access:
/// - `RATE_LIMIT_REQUESTS`: Max requests per client per window (default: 100)
/// - `RATE_LIMIT_WINDOW_MS`: Window duration in milliseconds (default: 60000)
/// - `PROXY_TIMEOUT_MS`: Upstream request timeout in milliseconds (default: 30000)
///
/// # Example
///
/// ```
/// use hostgate::config::get_proxy_settings;
///
/// let settings = get_proxy_settings();
/// println!(
///     "Allowing {} requests per {}ms",
///     settings.rate_limit.max_requests,
///     settings.rate_limit.window_ms()
/// );
/// ```
pub fn get_proxy_settings() -> ProxySettings {
    ProxySettings {
        rate_limit: *RATE_LIMIT_CONFIG,
        upstream: *UPSTREAM_CONFIG,
    }
}

/// Compute rate limiting configuration from environment variables
/// Invalid values fall back to defaults and log warnings
fn compute_rate_limit_config() -> RateLimitConfig {
    let max_requests =
        parse_env_var_or_default(env_vars::RATE_LIMIT_REQUESTS, defaults::RATE_LIMIT_REQUESTS);

    let window_ms = parse_env_var_or_default(
        env_vars::RATE_LIMIT_WINDOW_MS,
        defaults::RATE_LIMIT_WINDOW_MS,
    );

    let config = RateLimitConfig {
        max_requests,
        window: Duration::from_millis(window_ms),
    };

    // Validate configuration
    if !config.is_valid() {
        warn!("Invalid rate limit configuration, using defaults");
        return RateLimitConfig::default();
    }

    config
}

/// Computes upstream forwarding configuration from environment variables.
fn compute_upstream_config() -> UpstreamConfig {
    let timeout_ms =
        parse_env_var_or_default(env_vars::PROXY_TIMEOUT_MS, defaults::PROXY_TIMEOUT_MS);

    let config = UpstreamConfig {
        timeout: Duration::from_millis(timeout_ms),
    };

    // Validate configuration
    if !config.is_valid() {
        warn!("Invalid proxy timeout, using default");
        return UpstreamConfig::default();
    }

    config
}

/// Returns the cached allowed host patterns.
///
/// Read from the `ALLOWED_HOSTS` environment variable on first access, as a
/// comma-separated list. The list is returned as written; compiling it (and
/// rejecting an empty one) is the whitelist's job at startup.
///
/// # Example
///
/// ```
/// use hostgate::config::get_allowed_host_patterns;
///
/// for pattern in get_allowed_host_patterns() {
///     println!("Allowing hosts matching: {}", pattern);
/// }
/// ```
pub fn get_allowed_host_patterns() -> &'static [String] {
    &ALLOWED_HOST_PATTERNS
}

/// Computes allowed host patterns from an environment lookup function.
fn compute_allowed_host_patterns_internal<F>(env_var: F) -> Vec<String>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    env_var(env_vars::ALLOWED_HOSTS)
        .map(|value| parse_comma_separated(&value))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // Helper function to create a mock environment function for testing
    fn create_mock_env(
        vars: HashMap<&str, &str>,
    ) -> impl Fn(&str) -> Result<String, std::env::VarError> {
        move |key: &str| {
            vars.get(key)
                .map(|v| v.to_string())
                .ok_or(std::env::VarError::NotPresent)
        }
    }

    #[test]
    fn test_allowed_host_patterns_parsed() {
        let mut env_vars = HashMap::new();
        env_vars.insert(env_vars::ALLOWED_HOSTS, "api.openai.com,*.github.com");
        let env_fn = create_mock_env(env_vars);

        let patterns = compute_allowed_host_patterns_internal(env_fn);

        assert_eq!(patterns, vec!["api.openai.com", "*.github.com"]);
    }

    #[test]
    fn test_allowed_host_patterns_handles_whitespace() {
        let mut env_vars = HashMap::new();
        env_vars.insert(env_vars::ALLOWED_HOSTS, " api.openai.com , *.github.com ");
        let env_fn = create_mock_env(env_vars);

        let patterns = compute_allowed_host_patterns_internal(env_fn);

        assert_eq!(patterns, vec!["api.openai.com", "*.github.com"]);
    }

    #[test]
    fn test_allowed_host_patterns_skips_empty_entries() {
        let mut env_vars = HashMap::new();
        env_vars.insert(env_vars::ALLOWED_HOSTS, "api.openai.com,,  ,*.github.com,");
        let env_fn = create_mock_env(env_vars);

        let patterns = compute_allowed_host_patterns_internal(env_fn);

        assert_eq!(patterns, vec!["api.openai.com", "*.github.com"]);
    }

    #[test]
    fn test_allowed_host_patterns_empty_when_unset() {
        let env_fn = create_mock_env(HashMap::new());

        let patterns = compute_allowed_host_patterns_internal(env_fn);

        assert!(patterns.is_empty());
    }

    #[test]
    fn test_allowed_host_patterns_empty_when_blank() {
        let mut env_vars = HashMap::new();
        env_vars.insert(env_vars::ALLOWED_HOSTS, "   ");
        let env_fn = create_mock_env(env_vars);

        let patterns = compute_allowed_host_patterns_internal(env_fn);

        assert!(patterns.is_empty());
    }

    #[test]
    fn test_parse_comma_separated() {
        assert_eq!(parse_comma_separated("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_comma_separated(" a , b "), vec!["a", "b"]);
        assert!(parse_comma_separated("").is_empty());
        assert!(parse_comma_separated(" , ,").is_empty());
    }
}
