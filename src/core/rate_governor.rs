use std::num::NonZeroU32;
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

use crate::utils::{IntelError, IntelResult};

/// Fixed-interval governor for calls to a quota-limited API
///
/// Backed by a GCRA limiter with a burst of one: the first governed call passes
/// immediately and every following call waits until `60 / R` seconds have
/// elapsed since the previous one. There is no burst allowance and no adaptive
/// backoff. The limiter runs on its own clock, so the runtime instant of the
/// last call is kept as well and any remainder is slept out on the tokio clock.
/// Waiters are serialized on that instant, so a shared governor stays correct.
pub struct RateGovernor {
    limiter: DefaultDirectRateLimiter,
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateGovernor {
    /// Create a governor allowing `requests_per_minute` calls per 60 seconds
    pub fn per_minute(requests_per_minute: u32) -> IntelResult<Self> {
        let rate = NonZeroU32::new(requests_per_minute).ok_or_else(|| {
            IntelError::Config(config::ConfigError::Message(
                "rate must be greater than zero".to_string(),
            ))
        })?;
        Self::with_interval(Duration::from_secs(60) / rate.get())
    }

    /// Create a governor with an explicit minimum interval between calls
    pub fn with_interval(interval: Duration) -> IntelResult<Self> {
        let quota = Quota::with_period(interval).ok_or_else(|| {
            IntelError::Config(config::ConfigError::Message(
                "rate interval must be non-zero".to_string(),
            ))
        })?;

        Ok(Self {
            limiter: RateLimiter::direct(quota),
            interval,
            last_call: Mutex::new(None),
        })
    }

    /// Minimum time between two governed calls
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Suspend until the next call is allowed, then record it
    ///
    /// Must be awaited exactly once per governed call. Never fails.
    pub async fn wait(&self) {
        let mut last_call = self.last_call.lock().await;

        if self.limiter.check().is_err() {
            tracing::debug!(interval_ms = self.interval.as_millis() as u64, "rate governor waiting");
            self.limiter.until_ready().await;
        }
        if let Some(last) = *last_call {
            sleep_until(last + self.interval).await;
        }

        *last_call = Some(Instant::now());
    }
}
