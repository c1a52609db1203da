//! Rate limiter implementation using governor and Tokio Semaphore.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use ritra_core::RateLimitConfig;
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter shared by every call a client makes.
///
/// Cloning is cheap and clones share quota.
///
/// # Example
///
/// ```
/// use ritra_core::RateLimitConfig;
/// use ritra_rate_limit::RateLimiter;
///
/// # async fn example() {
/// let limiter = RateLimiter::new(&RateLimitConfig {
///     requests_per_minute: Some(10),
///     max_concurrent: Some(2),
/// });
///
/// let guard = limiter.acquire().await;
/// // Make API call...
/// drop(guard); // Releases concurrent slot
/// # }
/// ```
#[derive(Clone, Default)]
pub struct RateLimiter {
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    concurrent_semaphore: Option<Arc<Semaphore>>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("rpm", &self.rpm_limiter.is_some())
            .field(
                "available_slots",
                &self.concurrent_semaphore.as_ref().map(|s| s.available_permits()),
            )
            .finish()
    }
}

impl RateLimiter {
    /// Create a limiter enforcing every limit set in `config`.
    pub fn new(config: &RateLimitConfig) -> Self {
        let rpm_limiter = config
            .requests_per_minute
            .and_then(NonZeroU32::new)
            .map(|n| Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))));

        let concurrent_semaphore = config
            .max_concurrent
            .filter(|n| *n > 0)
            .map(|n| Arc::new(Semaphore::new(n as usize)));

        tracing::debug!(
            rpm = ?config.requests_per_minute,
            max_concurrent = ?config.max_concurrent,
            "Created rate limiter"
        );

        Self {
            rpm_limiter,
            concurrent_semaphore,
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// True if no limit is configured.
    pub fn is_unlimited(&self) -> bool {
        self.rpm_limiter.is_none() && self.concurrent_semaphore.is_none()
    }

    /// Wait until a request is allowed.
    ///
    /// Returns a guard that releases the concurrent slot when dropped. The
    /// RPM quota is consumed first so a waiting request does not hold a slot.
    pub async fn acquire(&self) -> RateLimiterGuard {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }

        let permit = match &self.concurrent_semaphore {
            // The semaphore is never closed, so acquisition only fails if it were.
            Some(semaphore) => semaphore.clone().acquire_owned().await.ok(),
            None => None,
        };

        RateLimiterGuard { _permit: permit }
    }

    /// Try to acquire without waiting.
    ///
    /// Returns `None` if any limit would block.
    pub fn try_acquire(&self) -> Option<RateLimiterGuard> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.check().ok()?;
        }

        let permit = match &self.concurrent_semaphore {
            Some(semaphore) => Some(semaphore.clone().try_acquire_owned().ok()?),
            None => None,
        };

        Some(RateLimiterGuard { _permit: permit })
    }
}

/// Guard that holds a concurrent request slot.
///
/// The slot is released when the guard is dropped.
#[derive(Debug)]
pub struct RateLimiterGuard {
    _permit: Option<OwnedSemaphorePermit>,
}
