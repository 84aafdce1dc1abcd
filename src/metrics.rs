use serde::Serialize;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct MetricsInner {
    total_requests: u64,
    successful_requests: u64,
    failed_requests: u64,
    cache_hits: u64,
    cache_misses: u64,
    total_articles: u64,
    // Running sum and count keep the average O(1) in memory over the
    // process lifetime
    response_time_total: f64,
    response_time_samples: u64,
}

/// Point-in-time view of the collected counters with derived rates.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub success_rate: f64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_rate: f64,
    pub avg_response_time: f64,
    pub avg_articles_per_request: f64,
    pub total_articles_delivered: u64,
}

/// In-process request counters. One instance per service, no globals.
pub struct MetricsCollector {
    inner: Mutex<MetricsInner>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsInner::default()),
        }
    }

    pub async fn record_request(
        &self,
        success: bool,
        response_time: f64,
        num_articles: usize,
        from_cache: bool,
    ) {
        let mut inner = self.inner.lock().await;
        inner.total_requests += 1;
        if success {
            inner.successful_requests += 1;
        } else {
            inner.failed_requests += 1;
        }
        if from_cache {
            inner.cache_hits += 1;
        } else {
            inner.cache_misses += 1;
        }
        inner.total_articles += num_articles as u64;
        inner.response_time_total += response_time;
        inner.response_time_samples += 1;
    }

    pub async fn summary(&self) -> MetricsSummary {
        let inner = self.inner.lock().await;
        let total = inner.total_requests;

        let rate = |part: u64| {
            if total == 0 {
                0.0
            } else {
                part as f64 / total as f64
            }
        };

        let avg_response_time = if inner.response_time_samples == 0 {
            0.0
        } else {
            inner.response_time_total / inner.response_time_samples as f64
        };

        MetricsSummary {
            total_requests: total,
            successful_requests: inner.successful_requests,
            failed_requests: inner.failed_requests,
            success_rate: rate(inner.successful_requests),
            cache_hits: inner.cache_hits,
            cache_misses: inner.cache_misses,
            cache_hit_rate: rate(inner.cache_hits),
            avg_response_time,
            avg_articles_per_request: rate(inner.total_articles),
            total_articles_delivered: inner.total_articles,
        }
    }

    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        *inner = MetricsInner::default();
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
