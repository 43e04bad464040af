//! Core types for HostGate configuration and shared state.
//!
//! The configuration structs are plain values: they are parsed once by the
//! binary crate at startup and passed into the pipeline, which treats them
//! as fixed inputs. The only shared mutable state in the system is the
//! [`RateLimiter`] map.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::defaults;

/// Rate limiting configuration.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum number of requests admitted per window.
    pub max_requests: u32,
    /// Sliding window size.
    pub window: Duration,
}

impl RateLimitConfig {
    /// Window size in milliseconds, the unit request timestamps use.
    pub fn window_ms(&self) -> u64 {
        self.window.as_millis() as u64
    }

    /// Returns true if the configuration values are usable.
    pub fn is_valid(&self) -> bool {
        self.max_requests > 0 && !self.window.is_zero()
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: defaults::RATE_LIMIT_REQUESTS,
            window: defaults::RATE_LIMIT_WINDOW,
        }
    }
}

/// Upstream forwarding configuration.
#[derive(Debug, Clone, Copy)]
pub struct UpstreamConfig {
    /// Budget for one upstream call, armed before the call starts.
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Timeout in milliseconds, as reported in 504 responses.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Returns true if the configuration values are usable.
    pub fn is_valid(&self) -> bool {
        !self.timeout.is_zero()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout: defaults::PROXY_TIMEOUT,
        }
    }
}

/// All settings consumed by the request pipeline, fixed at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxySettings {
    /// Per-client admission limits.
    pub rate_limit: RateLimitConfig,
    /// Upstream call behavior.
    pub upstream: UpstreamConfig,
}

impl ProxySettings {
    /// Returns true if every setting is usable.
    pub fn is_valid(&self) -> bool {
        self.rate_limit.is_valid() && self.upstream.is_valid()
    }
}

/// Request timestamps for one client within the trailing window,
/// milliseconds since the Unix epoch, in arrival order.
pub type RateWindow = Vec<u64>;

/// Shared rate limiter state.
///
/// Maps client identifiers to their [`RateWindow`]. Cloning shares the
/// underlying map, so the accept loop can hand one limiter to every
/// connection task. Per-client windows are pruned on each access; the map
/// itself grows with the client population for the process lifetime.
///
/// # Example
///
/// ```
/// use hostgate_core::RateLimiter;
///
/// let limiter = RateLimiter::new();
/// let shared = limiter.clone();
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    inner: Arc<Mutex<HashMap<String, RateWindow>>>,
}

impl RateLimiter {
    /// Creates an empty rate limiter.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Access to the underlying map.
    pub fn inner(&self) -> &Arc<Mutex<HashMap<String, RateWindow>>> {
        &self.inner
    }
}
