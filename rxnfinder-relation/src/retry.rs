/// Retry logic with exponential backoff for graph requests
use rand::Rng;
use rxnfinder_core::config::RelationEngineConfig;
use rxnfinder_core::{RxnFinderError, RxnFinderResult};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = max_retries + 1)
    pub max_retries: u32,
    /// Initial backoff duration
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// Backoff multiplier (typically 2.0)
    pub multiplier: f32,
    /// Add jitter to prevent thundering herd
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Policy with the given retry budget and starting backoff
    pub fn new(max_retries: u32, initial_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
            ..Self::default()
        }
    }

    pub fn from_config(config: &RelationEngineConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_backoff_ms),
        )
    }

    /// Retry without sleeping in between
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            multiplier: 1.0,
            jitter: false,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Calculate backoff duration for attempt number
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let mut backoff = self.initial_backoff.as_millis() as f32;

        for _ in 0..attempt {
            backoff *= self.multiplier;
        }

        let mut duration =
            Duration::from_millis(backoff.min(self.max_backoff.as_millis() as f32) as u64);

        if self.jitter && duration > Duration::ZERO {
            let mut rng = rand::thread_rng();
            let jitter_ms = rng.gen_range(0..=(duration.as_millis() / 4) as u64);
            duration += Duration::from_millis(jitter_ms);
        }

        duration
    }
}

/// Successful value and the number of retries it took
#[derive(Debug)]
pub struct Retried<T> {
    pub value: T,
    pub retries: u32,
}

/// Last error once retries are used up, or the first non-transient error
#[derive(Debug)]
pub struct RetryExhausted {
    pub error: RxnFinderError,
    pub attempts: u32,
}

/// Execute an async operation, retrying errors for which `is_transient()` holds
pub async fn with_retry_async<F, Fut, T>(
    mut operation: F,
    policy: &RetryPolicy,
    context: &str,
) -> Result<Retried<T>, RetryExhausted>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = RxnFinderResult<T>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("{} succeeded after {} retries", context, attempt);
                }
                return Ok(Retried {
                    value,
                    retries: attempt,
                });
            }
            Err(err) => {
                if !err.is_transient() {
                    error!("Non-retryable error in {}: {}", context, err);
                    return Err(RetryExhausted {
                        error: err,
                        attempts: attempt + 1,
                    });
                }

                if attempt + 1 >= max_attempts {
                    error!("All {} attempts failed for {}: {}", max_attempts, context, err);
                    return Err(RetryExhausted {
                        error: err,
                        attempts: attempt + 1,
                    });
                }

                let backoff = policy.calculate_backoff(attempt);
                warn!(
                    "Attempt {}/{} failed for {}: {}. Retrying in {:?}",
                    attempt + 1,
                    max_attempts,
                    context,
                    err,
                    backoff
                );
                if !backoff.is_zero() {
                    tokio::time::sleep(backoff).await;
                }
                attempt += 1;
            }
        }
    }
}
