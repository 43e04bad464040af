//! Connection management utilities for HostGate.
//!
//! This module provides connection limiting with a semaphore so a flood of
//! inbound connections cannot exhaust file descriptors or spawn unbounded
//! tasks. Permits are acquired in the accept loop and released when the
//! connection task finishes.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Cap on concurrent connections, enforced at accept time.
///
/// A cap of `0` disables limiting entirely: no semaphore is allocated and
/// [`try_acquire`] always returns `None`. The accept loop therefore treats
/// a `None` permit as "over capacity" only when [`is_enabled`] is true.
///
/// [`try_acquire`]: ConnectionLimiter::try_acquire
/// [`is_enabled`]: ConnectionLimiter::is_enabled
#[derive(Debug, Clone)]
pub struct ConnectionLimiter {
    semaphore: Option<Arc<Semaphore>>,
    max_connections: usize,
}

impl ConnectionLimiter {
    /// Creates a limiter for `max_connections` concurrent connections,
    /// or an unlimited one when `max_connections` is 0.
    pub fn new(max_connections: usize) -> Self {
        Self {
            semaphore: (max_connections > 0)
                .then(|| Arc::new(Semaphore::new(max_connections))),
            max_connections,
        }
    }

    /// True when a cap is configured.
    pub fn is_enabled(&self) -> bool {
        self.semaphore.is_some()
    }

    /// The configured cap (0 means unlimited).
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Takes a permit for one connection.
    ///
    /// The permit frees its slot on drop, so the connection task holds it
    /// for its whole lifetime. Returns `None` when no cap is configured or
    /// when every slot is taken; [`is_enabled`] distinguishes the two.
    ///
    /// [`is_enabled`]: ConnectionLimiter::is_enabled
    pub fn try_acquire(&self) -> Option<OwnedSemaphorePermit> {
        self.semaphore
            .as_ref()
            .and_then(|sem| sem.clone().try_acquire_owned().ok())
    }

    /// True when a cap is configured and every slot is taken.
    pub fn at_capacity(&self) -> bool {
        self.semaphore
            .as_ref()
            .is_some_and(|sem| sem.available_permits() == 0)
    }
}
