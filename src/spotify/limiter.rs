use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Process-wide token bucket shared by every request the client sends.
///
/// The bucket holds up to `burst` slots and regains one slot every
/// `interval`. Waiting for a slot is the only place the client suspends and
/// it can be cut short through a [`CancellationToken`].
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    burst: f64,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    pub fn new(interval: Duration, burst: u32) -> Self {
        let burst = f64::from(burst.max(1));
        Self {
            interval,
            burst,
            bucket: Mutex::new(Bucket {
                tokens: burst,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Waits until a request slot is free and takes it.
    ///
    /// Returns [`ClientError::Cancelled`] as soon as `cancel` fires while
    /// waiting; the slot is not consumed in that case.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), ClientError> {
        loop {
            if cancel.is_cancelled() {
                return Err(ClientError::Cancelled);
            }

            let wait = match self.try_take() {
                None => return Ok(()),
                Some(wait) => wait,
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ClientError::Cancelled),
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }

    /// Takes a slot if one is available, otherwise returns how long until the
    /// next one is.
    fn try_take(&self) -> Option<Duration> {
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        if self.interval.is_zero() {
            bucket.last_refill = now;
            return None;
        }

        let elapsed = now.saturating_duration_since(bucket.last_refill);
        let regained = elapsed.as_secs_f64() / self.interval.as_secs_f64();
        bucket.tokens = (bucket.tokens + regained).min(self.burst);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            None
        } else {
            let missing = 1.0 - bucket.tokens;
            Some(self.interval.mul_f64(missing))
        }
    }
}
