use crate::types::{FetchConfig, NewsError, Result};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, error, warn};
use url::Url;

/// HTTP transport for feed documents and article pages.
///
/// Feed fetches get exponential-backoff retries; page fetches are one-shot
/// with a short timeout since enrichment degrades gracefully anyway.
pub struct FeedClient {
    client: Client,
    config: FetchConfig,
    last_request: Arc<RwLock<HashMap<String, Instant>>>,
}

impl FeedClient {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.feed_timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            config,
            last_request: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch a feed document as text, retrying transient failures.
    pub async fn fetch_feed(&self, url: &str) -> Result<String> {
        debug!("Fetching feed: {}", url);
        self.apply_courtesy_delay(url).await?;

        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 32),
            multiplier: 2.0,
            max_elapsed_time: Some(Duration::from_secs(self.config.retry_delay_seconds * 60)),
            ..Default::default()
        };

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let content = response.text().await?;
                        debug!("Fetched feed: {} ({} bytes)", url, content.len());
                        return Ok(content);
                    }
                    last_error = Some(NewsError::UpstreamStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                    // 4xx won't get better on retry
                    if status.is_client_error() {
                        break;
                    }
                }
                Err(e) => {
                    last_error = Some(NewsError::Http(e));
                }
            }

            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!("Attempt {} failed for {}, retrying in {:?}", attempt + 1, url, delay);
                    tokio::time::sleep(delay).await;
                    continue;
                }
            }
            break;
        }

        error!("Giving up on feed after {} attempts: {}", self.config.max_retries + 1, url);
        Err(last_error.unwrap_or_else(|| NewsError::Parse(format!("fetch failed: {}", url))))
    }

    /// Fetch an article page once with the short page timeout.
    /// Returns the HTTP status and body; the caller decides what non-200 means.
    pub async fn fetch_page(&self, url: &str) -> Result<(u16, String)> {
        debug!("Fetching page: {}", url);
        self.apply_courtesy_delay(url).await?;

        let response = self
            .client
            .get(url)
            .timeout(Duration::from_secs(self.config.page_timeout_seconds))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// Follow redirects to find the final article URL.
    ///
    /// Keeps the original when resolution fails or never leaves the
    /// starting host (aggregator links that did not actually redirect).
    pub async fn resolve_redirect(&self, url: &str) -> String {
        let request = self
            .client
            .get(url)
            .timeout(Duration::from_secs(self.config.page_timeout_seconds));

        match request.send().await {
            Ok(response) => {
                let resolved = response.url().to_string();
                if same_host(url, &resolved) {
                    url.to_string()
                } else {
                    debug!("Resolved {} -> {}", url, resolved);
                    resolved
                }
            }
            Err(e) => {
                debug!("Redirect resolution failed for {}: {}", url, e);
                url.to_string()
            }
        }
    }

    /// Space out requests to the same host.
    async fn apply_courtesy_delay(&self, url: &str) -> Result<()> {
        if self.config.courtesy_delay_ms == 0 {
            return Ok(());
        }

        let parsed = Url::parse(url)?;
        let host = parsed.host_str().unwrap_or("").to_string();
        let min_interval = Duration::from_millis(self.config.courtesy_delay_ms);

        // Compute the wait without holding the lock across the sleep, so a
        // pause for one host never stalls requests to other hosts
        let wait = {
            let last_request = self.last_request.read().await;
            last_request.get(&host).and_then(|last| {
                let elapsed = last.elapsed();
                (elapsed < min_interval).then(|| min_interval - elapsed)
            })
        };

        if let Some(wait) = wait {
            debug!("Spacing requests to {}: waiting {:?}", host, wait);
            tokio::time::sleep(wait).await;
        }

        let mut last_request = self.last_request.write().await;
        last_request.insert(host, Instant::now());

        Ok(())
    }
}

fn same_host(original: &str, resolved: &str) -> bool {
    match (Url::parse(original), Url::parse(resolved)) {
        (Ok(a), Ok(b)) => a.host_str() == b.host_str(),
        _ => true,
    }
}
