//! Sliding-window rate limiting.
//!
//! Each client maps to the list of its request timestamps inside the
//! trailing window. The window slides continuously with the clock rather
//! than resetting at fixed boundaries: a request is admitted while fewer
//! than `max_requests` timestamps remain within `window_ms` of now.
//!
//! The whole read-prune-check-append sequence for a client runs under the
//! map lock, so concurrent requests from one client cannot race each other
//! past the limit.

use tracing::debug;

use crate::types::{RateLimitConfig, RateLimiter};

/// Checks whether a request from `client_id` at `now_ms` is admitted.
///
/// Prunes the client's timestamps that have left the window, then admits
/// the request iff the remaining count is below `config.max_requests`. On
/// admission `now_ms` is recorded; on rejection the pruned list is kept
/// as-is, so a rejected request consumes no quota.
///
/// Rejected requests must be answered immediately with 429; there is no
/// queueing or delay here.
///
/// # Arguments
///
/// * `limiter` - Shared rate limiter state
/// * `client_id` - Client identifier (the peer IP address)
/// * `now_ms` - Current time in milliseconds since the Unix epoch
/// * `config` - Rate limiting configuration
///
/// # Returns
///
/// `true` if the request is admitted, `false` if it must be rejected.
pub async fn check_rate_limit(
    limiter: &RateLimiter,
    client_id: &str,
    now_ms: u64,
    config: &RateLimitConfig,
) -> bool {
    let window_ms = config.window_ms();
    let mut rate_map = limiter.inner().lock().await;
    let window = rate_map.entry(client_id.to_string()).or_default();

    window.retain(|&stamp| now_ms.saturating_sub(stamp) < window_ms);

    if window.len() < config.max_requests as usize {
        window.push(now_ms);
        true
    } else {
        debug!(
            client = %client_id,
            in_window = window.len(),
            "rate limit window full"
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(max_requests: u32, window_ms: u64) -> RateLimitConfig {
        RateLimitConfig {
            max_requests,
            window: Duration::from_millis(window_ms),
        }
    }

    #[tokio::test]
    async fn test_first_request_is_admitted() {
        let limiter = RateLimiter::new();
        let cfg = config(3, 1000);
        assert!(check_rate_limit(&limiter, "192.0.2.1", 0, &cfg).await);
    }

    #[tokio::test]
    async fn test_requests_within_limit_are_admitted() {
        let limiter = RateLimiter::new();
        let cfg = config(3, 1000);

        assert!(check_rate_limit(&limiter, "192.0.2.1", 0, &cfg).await);
        assert!(check_rate_limit(&limiter, "192.0.2.1", 100, &cfg).await);
        assert!(check_rate_limit(&limiter, "192.0.2.1", 200, &cfg).await);
    }

    #[tokio::test]
    async fn test_request_over_limit_is_rejected() {
        let limiter = RateLimiter::new();
        let cfg = config(3, 1000);

        for at in [0, 100, 200] {
            assert!(check_rate_limit(&limiter, "192.0.2.1", at, &cfg).await);
        }
        assert!(!check_rate_limit(&limiter, "192.0.2.1", 300, &cfg).await);
    }

    #[tokio::test]
    async fn test_window_slides_past_old_requests() {
        let limiter = RateLimiter::new();
        let cfg = config(3, 1000);

        for at in [0, 100, 200] {
            assert!(check_rate_limit(&limiter, "192.0.2.1", at, &cfg).await);
        }
        assert!(!check_rate_limit(&limiter, "192.0.2.1", 900, &cfg).await);

        // 1050ms: the request at t=0 has left the window.
        assert!(check_rate_limit(&limiter, "192.0.2.1", 1050, &cfg).await);
    }

    #[tokio::test]
    async fn test_timestamp_exactly_window_old_is_pruned() {
        let limiter = RateLimiter::new();
        let cfg = config(1, 1000);

        assert!(check_rate_limit(&limiter, "192.0.2.1", 0, &cfg).await);
        assert!(check_rate_limit(&limiter, "192.0.2.1", 1000, &cfg).await);
    }

    #[tokio::test]
    async fn test_rejected_request_consumes_no_quota() {
        let limiter = RateLimiter::new();
        let cfg = config(1, 1000);

        assert!(check_rate_limit(&limiter, "192.0.2.1", 0, &cfg).await);
        assert!(!check_rate_limit(&limiter, "192.0.2.1", 10, &cfg).await);

        // Had the rejection at t=10 been recorded, this would still be
        // blocked (1005 - 10 < 1000). It must be admitted.
        assert!(check_rate_limit(&limiter, "192.0.2.1", 1005, &cfg).await);
    }

    #[tokio::test]
    async fn test_rejected_request_is_not_recorded() {
        let limiter = RateLimiter::new();
        let cfg = config(2, 1000);

        assert!(check_rate_limit(&limiter, "192.0.2.1", 0, &cfg).await);
        assert!(check_rate_limit(&limiter, "192.0.2.1", 1, &cfg).await);
        assert!(!check_rate_limit(&limiter, "192.0.2.1", 500, &cfg).await);

        // Only the two admitted stamps are in the window; the rejected
        // probe at 500 left no trace.
        let map = limiter.inner().lock().await;
        let window = map.get("192.0.2.1").expect("entry exists");
        assert_eq!(window.as_slice(), &[0, 1]);
    }

    #[tokio::test]
    async fn test_clients_are_limited_independently() {
        let limiter = RateLimiter::new();
        let cfg = config(1, 1000);

        assert!(check_rate_limit(&limiter, "192.0.2.1", 0, &cfg).await);
        assert!(check_rate_limit(&limiter, "192.0.2.2", 0, &cfg).await);
        assert!(!check_rate_limit(&limiter, "192.0.2.1", 10, &cfg).await);
        assert!(!check_rate_limit(&limiter, "192.0.2.2", 10, &cfg).await);
    }

    #[tokio::test]
    async fn test_ipv6_clients_are_tracked() {
        let limiter = RateLimiter::new();
        let cfg = config(1, 1000);

        assert!(check_rate_limit(&limiter, "2001:db8::1", 0, &cfg).await);
        assert!(!check_rate_limit(&limiter, "2001:db8::1", 10, &cfg).await);
        assert!(check_rate_limit(&limiter, "2001:db8::2", 10, &cfg).await);
    }

    #[tokio::test]
    async fn test_timestamps_recorded_in_arrival_order() {
        let limiter = RateLimiter::new();
        let cfg = config(5, 10_000);

        for at in [5, 17, 120] {
            assert!(check_rate_limit(&limiter, "192.0.2.1", at, &cfg).await);
        }

        let map = limiter.inner().lock().await;
        assert_eq!(map.get("192.0.2.1").map(Vec::as_slice), Some([5, 17, 120].as_slice()));
    }

    #[tokio::test]
    async fn test_concurrent_requests_never_overshoot() {
        let limiter = RateLimiter::new();
        let cfg = config(5, 60_000);

        let mut handles = Vec::new();
        for _ in 0..20 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                check_rate_limit(&limiter, "192.0.2.1", 1000, &cfg).await
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.expect("task must not panic") {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 5);
    }
}
