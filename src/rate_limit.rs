use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::warn;

/// Sliding-window rate limiter over request timestamps.
///
/// Purge, check and record happen under one lock, so concurrent callers
/// can never both claim the last slot in the window.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    requests: Mutex<Vec<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Admit the request if the window has room, recording it on success.
    pub async fn is_allowed(&self) -> bool {
        let mut requests = self.requests.lock().await;
        let now = Instant::now();

        requests.retain(|t| now.duration_since(*t) < self.window);

        if requests.len() < self.max_requests {
            requests.push(now);
            true
        } else {
            warn!(
                "Rate limit reached: {} requests in the last {:?}",
                requests.len(),
                self.window
            );
            false
        }
    }

    /// Seconds until the oldest in-window request ages out. Zero when the
    /// window already has room.
    pub async fn wait_time(&self) -> f64 {
        let mut requests = self.requests.lock().await;
        let now = Instant::now();

        requests.retain(|t| now.duration_since(*t) < self.window);

        if requests.len() < self.max_requests {
            return 0.0;
        }

        requests
            .iter()
            .min()
            .map(|oldest| {
                let age = now.duration_since(*oldest);
                (self.window.saturating_sub(age)).as_secs_f64()
            })
            .unwrap_or(0.0)
    }
}
