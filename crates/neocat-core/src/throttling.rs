//! Request pacing against the shared API-wide rate limit.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Spaces outbound requests at least `min_interval` apart.
///
/// Backed by governor's monotonic clock, so wall-clock adjustments cannot
/// shrink or stretch the interval. The pipeline drives this from a single
/// task; FIFO ordering of callers is trivially satisfied.
pub struct RequestPacer {
    limiter: Option<DirectRateLimiter>,
    min_interval: Duration,
}

impl RequestPacer {
    /// A zero `min_interval` disables pacing entirely.
    pub fn new(min_interval: Duration) -> Self {
        let limiter =
            (!min_interval.is_zero()).then(|| RateLimiter::direct(interval_quota(min_interval)));
        Self {
            limiter,
            min_interval,
        }
    }

    /// Tries to take a permit without blocking. When the interval has not yet
    /// elapsed the recommended wait before re-acquiring is returned.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        match &self.limiter {
            None => Ok(()),
            Some(limiter) if limiter.check().is_ok() => Ok(()),
            Some(_) => Err(self.min_interval),
        }
    }

    /// Blocks the calling task until at least `min_interval` has elapsed
    /// since the previous permitted call. Returns immediately on the first
    /// call or once the interval has already passed.
    pub async fn wait(&self) {
        while let Err(delay) = self.try_acquire() {
            tokio::time::sleep(delay).await;
        }
    }

    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

fn interval_quota(min_interval: Duration) -> Quota {
    Quota::with_period(min_interval)
        .expect("pacing interval is non-zero")
        .allow_burst(NonZeroU32::new(1).expect("burst of one is non-zero"))
}
