//! Pacing between users in a bulk refresh.
//!
//! Both remote platforms throttle or block clients that hammer them, so the
//! bulk job calls [`RateLimiter::pace`] once after every user it processes.
//! The job does not care how the wait is produced; tests substitute a
//! limiter that only counts calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cpstats_core::RefreshLimiter;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Waits until the next unit of work may start.
    async fn pace(&self);
}

/// Sleeps a fixed delay on every call, regardless of how long the preceding
/// work took.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl RateLimiter for FixedDelay {
    async fn pace(&self) {
        if self.delay.is_zero() {
            return;
        }
        tracing::debug!(delay_ms = self.delay.as_millis(), "refresh: pacing");
        tokio::time::sleep(self.delay).await;
    }
}

/// Guarantees at least `interval` between consecutive releases.
///
/// Unlike [`FixedDelay`], time already spent on the previous unit of work
/// counts toward the interval, and the first call never waits.
#[derive(Debug)]
pub struct IntervalGate {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl IntervalGate {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }
}

#[async_trait]
impl RateLimiter for IntervalGate {
    async fn pace(&self) {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.interval;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Builds the limiter named by `kind`, spacing users by `delay`.
#[must_use]
pub fn limiter_for(kind: RefreshLimiter, delay: Duration) -> Arc<dyn RateLimiter> {
    match kind {
        RefreshLimiter::Fixed => Arc::new(FixedDelay::new(delay)),
        RefreshLimiter::Interval => Arc::new(IntervalGate::new(delay)),
    }
}
