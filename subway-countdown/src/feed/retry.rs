//! Bounded retry with a fixed delay.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

/// Default total attempts: the first try plus two retries.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts.
const DEFAULT_DELAY: Duration = Duration::from_secs(5);

/// Outcome of a single attempt.
#[derive(Debug)]
pub enum Attempt<T, E> {
    Success(T),
    /// Worth trying again (network error, timeout).
    Transient(E),
    /// Retrying cannot help.
    Fatal(E),
}

/// Why a retried operation gave up.
#[derive(Debug, PartialEq, Eq)]
pub enum RetryError<E> {
    /// An attempt failed in a way retrying cannot fix.
    Fatal(E),
    /// Every attempt failed transiently; `last` is the final cause.
    Exhausted { attempts: u32, last: E },
}

/// How many times to try and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. At least 1.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Run `op` until it succeeds, fails fatally, or attempts run out.
    ///
    /// `op` receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Attempt<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Attempt::Success(value) => return Ok(value),
                Attempt::Fatal(err) => return Err(RetryError::Fatal(err)),
                Attempt::Transient(err) if attempt >= self.max_attempts => {
                    return Err(RetryError::Exhausted {
                        attempts: attempt,
                        last: err,
                    });
                }
                Attempt::Transient(err) => {
                    debug!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = self.delay.as_millis() as u64,
                        error = %err,
                        "Transient failure, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(5));
    }

    #[test]
    fn zero_attempts_means_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[tokio::test]
    async fn success_first_try() {
        let calls = Cell::new(0);
        let result: Result<u8, RetryError<String>> = RetryPolicy::new(3, Duration::ZERO)
            .run(|_| {
                calls.set(calls.get() + 1);
                async { Attempt::Success(7) }
            })
            .await;

        assert_eq!(result, Ok(7));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let result: Result<u32, RetryError<String>> = RetryPolicy::new(3, Duration::ZERO)
            .run(|attempt| async move {
                if attempt < 3 {
                    Attempt::Transient(format!("timeout on attempt {attempt}"))
                } else {
                    Attempt::Success(attempt)
                }
            })
            .await;

        assert_eq!(result, Ok(3));
    }

    #[tokio::test]
    async fn exhausts_after_max_attempts() {
        let calls = Cell::new(0);
        let result: Result<(), RetryError<String>> = RetryPolicy::new(3, Duration::ZERO)
            .run(|attempt| {
                calls.set(calls.get() + 1);
                async move { Attempt::Transient(format!("refused {attempt}")) }
            })
            .await;

        assert_eq!(
            result,
            Err(RetryError::Exhausted {
                attempts: 3,
                last: "refused 3".to_string()
            })
        );
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn fatal_stops_immediately() {
        let calls = Cell::new(0);
        let result: Result<(), RetryError<String>> = RetryPolicy::new(3, Duration::ZERO)
            .run(|_| {
                calls.set(calls.get() + 1);
                async { Attempt::Fatal("forbidden".to_string()) }
            })
            .await;

        assert_eq!(result, Err(RetryError::Fatal("forbidden".to_string())));
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_fixed_delay_between_attempts() {
        let start = tokio::time::Instant::now();
        let _: Result<(), RetryError<String>> = RetryPolicy::new(3, Duration::from_secs(5))
            .run(|_| async { Attempt::Transient("down".to_string()) })
            .await;

        // Two pauses between three attempts, none after the last.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(10), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(15), "{elapsed:?}");
    }
}
