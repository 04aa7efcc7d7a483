use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Exponential backoff settings for startup connection attempts.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Scale each delay into 50-100% of its nominal value
    pub use_jitter: bool,
}

impl RetryConfig {
    /// 3 retries, 100 ms initial delay doubling up to 5 s, with jitter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay_ms: u64) -> Self {
        self.initial_delay_ms = delay_ms;
        self
    }

    pub fn with_max_delay(mut self, delay_ms: u64) -> Self {
        self.max_delay_ms = delay_ms;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Nominal delay before retry number `retry` (1-based), before jitter.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1) as i32;
        let nominal = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent);
        Duration::from_millis((nominal as u64).min(self.max_delay_ms))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
            use_jitter: true,
        }
    }
}

/// Retries `operation` with exponential backoff until it succeeds or retries run out.
///
/// The last error is returned unchanged.
///
/// ```ignore
/// let config = RetryConfig::new().with_max_retries(5);
/// let db = retry_with_backoff(|| postgres::connect(&url), config).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut retries = 0;

    loop {
        let err = match operation().await {
            Ok(result) => {
                if retries > 0 {
                    debug!(retries, "Operation succeeded after retrying");
                }
                return Ok(result);
            }
            Err(e) => e,
        };

        retries += 1;
        if retries > config.max_retries {
            warn!(attempts = retries, error = %err, "Operation failed, giving up");
            return Err(err);
        }

        let nominal = config.delay_for(retries);
        let delay = if config.use_jitter {
            apply_jitter(nominal)
        } else {
            nominal
        };

        debug!(
            attempt = retries,
            max_retries = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Operation failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

/// Picks a delay between 50% and 100% of `delay`.
fn apply_jitter(delay: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let percent = 50 + RandomState::new().hash_one(std::time::SystemTime::now()) % 51;
    delay * percent as u32 / 100
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counting_op(
        counter: Arc<AtomicU32>,
        succeed_on: u32,
    ) -> impl FnMut() -> std::future::Ready<Result<u32, String>> {
        move || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if attempt >= succeed_on {
                Ok(attempt)
            } else {
                Err(format!("attempt {} failed", attempt))
            })
        }
    }

    #[test]
    fn test_delay_for_doubles_and_caps() {
        let config = RetryConfig::new().with_initial_delay(100).with_max_delay(350);
        assert_eq!(config.delay_for(1), Duration::from_millis(100));
        assert_eq!(config.delay_for(2), Duration::from_millis(200));
        assert_eq!(config.delay_for(3), Duration::from_millis(350));
    }

    #[test]
    fn test_jitter_stays_within_half_to_full() {
        for _ in 0..20 {
            let jittered = apply_jitter(Duration::from_millis(1000));
            assert!(jittered >= Duration::from_millis(500));
            assert!(jittered <= Duration::from_millis(1000));
        }
    }

    #[tokio::test]
    async fn test_first_attempt_success_does_not_retry() {
        let counter = Arc::new(AtomicU32::new(0));
        let result =
            retry_with_backoff(counting_op(counter.clone(), 1), RetryConfig::default()).await;

        assert_eq!(result, Ok(1));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let counter = Arc::new(AtomicU32::new(0));
        let config = RetryConfig::new().without_jitter();

        let result = retry_with_backoff(counting_op(counter.clone(), 3), config).await;

        assert_eq!(result, Ok(3));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_with_last_error() {
        let counter = Arc::new(AtomicU32::new(0));
        let config = RetryConfig::new().with_max_retries(2).without_jitter();

        let result = retry_with_backoff(counting_op(counter.clone(), u32::MAX), config).await;

        assert_eq!(result, Err("attempt 3 failed".to_string()));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_waits_between_attempts() {
        let counter = Arc::new(AtomicU32::new(0));
        let config = RetryConfig::new().with_initial_delay(50).without_jitter();
        let start = tokio::time::Instant::now();

        let _ = retry_with_backoff(counting_op(counter, u32::MAX), config).await;

        // 50 + 100 + 200
        assert!(start.elapsed() >= Duration::from_millis(350));
    }
}
