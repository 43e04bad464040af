//! Test utilities for HostGate.
//!
//! This module provides shared test configuration helpers used across unit
//! tests. It is only compiled when running tests (`#[cfg(test)]`).

use std::time::Duration;

use crate::types::{ProxySettings, RateLimitConfig, UpstreamConfig};
use crate::whitelist::Whitelist;

/// Compiles a whitelist from literal patterns, panicking on bad input.
pub fn test_whitelist(patterns: &[&str]) -> Whitelist {
    Whitelist::compile(patterns).expect("test patterns must compile")
}

/// Builder for [`ProxySettings`] with production defaults and overrides
/// for the knobs a test cares about.
#[derive(Debug, Clone, Default)]
pub struct TestSettings {
    rate_limit: RateLimitConfig,
    upstream: UpstreamConfig,
}

impl TestSettings {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure rate limiting.
    pub fn with_rate_limit(mut self, max_requests: u32, window_ms: u64) -> Self {
        self.rate_limit = RateLimitConfig {
            max_requests,
            window: Duration::from_millis(window_ms),
        };
        self
    }

    /// Configure the upstream timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.upstream = UpstreamConfig {
            timeout: Duration::from_millis(timeout_ms),
        };
        self
    }

    /// Finish the builder.
    pub fn build(self) -> ProxySettings {
        ProxySettings {
            rate_limit: self.rate_limit,
            upstream: self.upstream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    #[test]
    fn test_default_settings_match_production_defaults() {
        let settings = TestSettings::new().build();
        assert_eq!(settings.rate_limit.max_requests, defaults::RATE_LIMIT_REQUESTS);
        assert_eq!(settings.upstream.timeout_ms(), defaults::PROXY_TIMEOUT_MS);
        assert!(settings.is_valid());
    }

    #[test]
    fn test_builder_overrides() {
        let settings = TestSettings::new()
            .with_rate_limit(3, 1_000)
            .with_timeout_ms(250)
            .build();

        assert_eq!(settings.rate_limit.max_requests, 3);
        assert_eq!(settings.rate_limit.window_ms(), 1_000);
        assert_eq!(settings.upstream.timeout_ms(), 250);
    }

    #[test]
    fn test_whitelist_helper_compiles_patterns() {
        let whitelist = test_whitelist(&["api.example.com", "*.example.org"]);
        assert_eq!(whitelist.len(), 2);
        assert!(whitelist.is_allowed("api.example.com"));
    }
}
