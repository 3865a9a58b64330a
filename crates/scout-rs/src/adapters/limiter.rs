//! Per-provider rate limiting.
//!
//! A token-bucket [`RateLimiter`]: the bucket starts full at `burst` tokens
//! and refills one token per `refill_interval`. Each fetch takes one token.
//! When the bucket is empty, the configured [`ExhaustedPolicy`] decides
//! between waiting (up to a bound) and failing fast with a "rate limited"
//! result.
//!
//! Counters are mutex-guarded so one limiter can be shared by concurrent
//! sessions; they are never reset within the life of the process.

use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

/// What to do when the bucket is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExhaustedPolicy {
    /// Sleep until a token is available, but never longer than `max_wait`.
    /// A wait that would exceed the bound fails instead.
    Wait { max_wait: Duration },
    /// Fail immediately without sleeping.
    FailFast,
}

/// Limiter configuration.
#[derive(Clone, Copy, Debug)]
pub struct RateLimiterConfig {
    /// Bucket capacity: how many calls may go through back-to-back.
    pub burst: u32,
    /// Time to regain one token.
    pub refill_interval: Duration,
    /// Behavior when the bucket is empty.
    pub policy: ExhaustedPolicy,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            burst: 2,
            refill_interval: Duration::from_secs(5),
            policy: ExhaustedPolicy::Wait {
                max_wait: Duration::from_secs(10),
            },
        }
    }
}

impl RateLimiterConfig {
    /// A config that fails fast with the given budget.
    pub fn fail_fast(burst: u32, refill_interval: Duration) -> Self {
        Self {
            burst,
            refill_interval,
            policy: ExhaustedPolicy::FailFast,
        }
    }
}

#[derive(Debug)]
struct BucketState {
    /// Fractional tokens currently available, capped at `burst`.
    tokens: f64,
    last_refill: Instant,
}

/// Token-bucket rate limiter for one provider.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    state: Mutex<BucketState>,
}

impl RateLimiter {
    /// Create a limiter with a full bucket.
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            state: Mutex::new(BucketState {
                tokens: f64::from(config.burst),
                last_refill: Instant::now(),
            }),
        }
    }

    /// Try to take one token without waiting.
    ///
    /// Returns `Err(wait)` with the time until the next token becomes
    /// available when the bucket is empty.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        // Refill based on elapsed time since the last refill.
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill);
        let refill = elapsed.as_secs_f64() / self.config.refill_interval.as_secs_f64();
        state.tokens = (state.tokens + refill).min(f64::from(self.config.burst));
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - state.tokens;
            Err(Duration::from_secs_f64(
                missing * self.config.refill_interval.as_secs_f64(),
            ))
        }
    }

    /// Take one token, honoring the exhaustion policy.
    ///
    /// Returns `Err(wait)` when the call is rate limited: immediately under
    /// [`ExhaustedPolicy::FailFast`], or when the needed wait exceeds the
    /// configured bound under [`ExhaustedPolicy::Wait`].
    pub async fn acquire(&self) -> Result<(), Duration> {
        let wait = match self.try_acquire() {
            Ok(()) => return Ok(()),
            Err(wait) => wait,
        };

        match self.config.policy {
            ExhaustedPolicy::FailFast => Err(wait),
            ExhaustedPolicy::Wait { max_wait } => {
                if wait > max_wait {
                    return Err(wait);
                }
                debug!("rate limiter: waiting {:.2}s for a token", wait.as_secs_f64());
                tokio::time::sleep(wait).await;
                // A concurrent caller may have taken the refilled token;
                // treat that as rate limited rather than waiting again.
                self.try_acquire()
            }
        }
    }

    /// The configured exhaustion policy.
    pub fn policy(&self) -> ExhaustedPolicy {
        self.config.policy
    }
}
