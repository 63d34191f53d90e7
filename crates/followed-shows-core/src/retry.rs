//! Bounded retry with backoff for fallible async operations.
//!
//! Only failures that report themselves as transient are retried. Dropping
//! the future returned by [`RetryPolicy::execute`] cancels it: no further
//! attempts start once the caller stops polling.

use followed_shows_config::RetryConfig;
use followed_shows_sources::SourceError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Errors that know whether repeating the operation could help
pub trait Retryable {
    fn is_transient(&self) -> bool;
}

impl Retryable for SourceError {
    fn is_transient(&self) -> bool {
        SourceError::is_transient(self)
    }
}

/// Why [`RetryPolicy::execute`] gave up
#[derive(Debug)]
pub enum RetryError<E> {
    /// A non-transient failure, surfaced on the attempt that produced it
    Permanent(E),
    /// Every attempt failed transiently; `last` is the final failure
    Exhausted { attempts: u32, last: E },
}

impl<E> RetryError<E> {
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Permanent(e) => e,
            RetryError::Exhausted { last, .. } => last,
        }
    }

    pub fn inner(&self) -> &E {
        match self {
            RetryError::Permanent(e) => e,
            RetryError::Exhausted { last, .. } => last,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Permanent(e) => write!(f, "{}", e),
            RetryError::Exhausted { attempts, last } => {
                write!(f, "gave up after {} attempts: {}", attempts, last)
            }
        }
    }
}

impl<E> std::error::Error for RetryError<E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner())
    }
}

type BackoffFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: BackoffFn,
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &"<fn>")
            .finish()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// `backoff(n)` is the wait before retry `n` (1 = the second attempt).
    /// `max_attempts` below 1 is raised to 1.
    pub fn new<B>(max_attempts: u32, backoff: B) -> Self
    where
        B: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Arc::new(backoff),
        }
    }

    /// Single attempt, no waiting
    pub fn no_retry() -> Self {
        Self::new(1, |_| Duration::ZERO)
    }

    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self::new(max_attempts, move |_| delay)
    }

    /// `initial * factor^(n-1)`, capped at `max`
    pub fn exponential(max_attempts: u32, initial: Duration, max: Duration, factor: f64) -> Self {
        Self::new(max_attempts, move |retry| {
            let exponent = retry.saturating_sub(1).min(32) as i32;
            let scaled = initial.as_secs_f64() * factor.powi(exponent);
            if !scaled.is_finite() || scaled >= max.as_secs_f64() {
                max
            } else {
                Duration::from_secs_f64(scaled)
            }
        })
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::exponential(
            config.max_attempts,
            Duration::from_millis(config.initial_delay_ms),
            Duration::from_millis(config.max_delay_ms),
            config.factor,
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay_for(&self, retry: u32) -> Duration {
        (self.backoff)(retry)
    }

    /// Run `operation` until it succeeds, fails permanently, or runs out of attempts
    pub async fn execute<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() => return Err(RetryError::Permanent(e)),
                Err(e) if attempt >= self.max_attempts => {
                    return Err(RetryError::Exhausted { attempts: attempt, last: e });
                }
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        "Attempt {}/{} failed ({}), retrying in {:?}",
                        attempt, self.max_attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
