use crate::types::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Fixed-delay retry wrapper for fallible async operations.
///
/// Unlike the exponential backoff used for individual feed fetches, this
/// guards whole pipeline runs: a small, constant number of attempts with a
/// constant pause between them.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Run `op` until it succeeds or attempts are exhausted; the last
    /// error is returned as-is.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if attempt >= self.attempts {
                        return Err(e);
                    }
                    warn!(
                        "Attempt {}/{} failed: {}; retrying in {:?}",
                        attempt, self.attempts, e, self.delay
                    );
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                }
            }
        }
    }
}
