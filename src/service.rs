use crate::cache::ResponseCache;
use crate::metrics::{MetricsCollector, MetricsSummary};
use crate::orchestrator::Orchestrator;
use crate::rate_limit::RateLimiter;
use crate::types::{FetchOptions, NewsResponse, ResponseMetrics};
use std::time::Instant;
use tracing::{info, warn};

const MIN_RESULTS: usize = 1;
const MAX_RESULTS: usize = 50;

/// Production wrapper around the orchestrator: input validation, rate
/// limiting, response caching and request metrics. All state lives on the
/// instance.
pub struct NewsService {
    orchestrator: Orchestrator,
    cache: ResponseCache,
    rate_limiter: RateLimiter,
    metrics: MetricsCollector,
}

impl NewsService {
    pub fn new(orchestrator: Orchestrator, cache: ResponseCache, rate_limiter: RateLimiter) -> Self {
        Self {
            orchestrator,
            cache,
            rate_limiter,
            metrics: MetricsCollector::new(),
        }
    }

    pub async fn fetch_news(&self, query: &str, options: FetchOptions) -> NewsResponse {
        let start = Instant::now();

        let query = query.trim();
        if query.is_empty() {
            warn!("Empty query received");
            return NewsResponse::failure(
                "Query cannot be empty",
                ResponseMetrics {
                    response_time: start.elapsed().as_secs_f64(),
                    num_articles: 0,
                    from_cache: false,
                    parallel: options.parallel,
                },
            );
        }

        let mut options = options;
        if !(MIN_RESULTS..=MAX_RESULTS).contains(&options.max_results) {
            warn!("Invalid max_results: {}, clamping", options.max_results);
            options.max_results = options.max_results.clamp(MIN_RESULTS, MAX_RESULTS);
        }

        info!(
            "Processing query: '{}' (max_results={}, enrich={})",
            query, options.max_results, options.enrich
        );

        // Rejected requests carry no article metrics
        if !self.rate_limiter.is_allowed().await {
            let wait = self.rate_limiter.wait_time().await;
            warn!("Rate limit exceeded. Wait {:.1}s", wait);
            return NewsResponse::failure(
                format!("Rate limit exceeded. Please wait {:.1} seconds.", wait),
                ResponseMetrics {
                    response_time: start.elapsed().as_secs_f64(),
                    num_articles: 0,
                    from_cache: false,
                    parallel: options.parallel,
                },
            );
        }

        if options.use_cache && !options.force_refresh {
            if let Some(cached) = self.cache.get(query, options.max_results).await {
                let elapsed = start.elapsed().as_secs_f64();
                self.metrics
                    .record_request(true, elapsed, cached.len(), true)
                    .await;
                info!("Returning {} cached results", cached.len());

                let num_articles = cached.len();
                return NewsResponse::success(
                    cached,
                    "Results from cache",
                    ResponseMetrics {
                        response_time: elapsed,
                        num_articles,
                        from_cache: true,
                        parallel: options.parallel,
                    },
                );
            }
        }

        info!("Fetching fresh results...");
        let mut response = self.orchestrator.fetch_news(query, &options).await;
        let elapsed = start.elapsed().as_secs_f64();
        response.metrics.response_time = elapsed;

        if response.success && options.use_cache {
            self.cache
                .set(query, options.max_results, response.data.clone())
                .await;
        }

        self.metrics
            .record_request(response.success, elapsed, response.data.len(), false)
            .await;

        response
    }

    pub async fn metrics(&self) -> MetricsSummary {
        self.metrics.summary().await
    }

    pub async fn reset_metrics(&self) {
        self.metrics.reset().await;
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Proactively drop expired cache entries; returns how many went.
    pub async fn sweep_expired(&self) -> usize {
        self.cache.sweep().await
    }
}
