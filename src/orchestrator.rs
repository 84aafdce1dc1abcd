use crate::completion::CompletionClient;
use crate::enrich::ContentEnricher;
use crate::fetch::FeedClient;
use crate::query::QueryInterpreter;
use crate::rank::RelevanceRanker;
use crate::retry::RetryPolicy;
use crate::sources::SourceFetcher;
use crate::summarize::Summarizer;
use crate::types::{Article, FetchOptions, NewsResponse, ResponseMetrics, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Upper bound on a single fetcher task.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Coordinates the full pipeline: interpret, fan out to fetchers, rank,
/// enrich, summarize.
///
/// `fetch_news` is total. Internal stage errors go through the retry
/// policy and, if they survive it, come back as a failure response.
pub struct Orchestrator {
    interpreter: QueryInterpreter,
    fetchers: Vec<Arc<dyn SourceFetcher>>,
    ranker: RelevanceRanker,
    enricher: ContentEnricher,
    summarizer: Summarizer,
    retry: RetryPolicy,
    fetch_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        feed_client: Arc<FeedClient>,
        fetchers: Vec<Arc<dyn SourceFetcher>>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            interpreter: QueryInterpreter::new(completion.clone()),
            fetchers,
            ranker: RelevanceRanker::new(completion.clone()),
            enricher: ContentEnricher::new(feed_client),
            summarizer: Summarizer::new(completion),
            retry,
            fetch_timeout: FETCH_TIMEOUT,
        }
    }

    pub fn with_enricher(mut self, enricher: ContentEnricher) -> Self {
        self.enricher = enricher;
        self
    }

    pub fn with_summarizer(mut self, summarizer: Summarizer) -> Self {
        self.summarizer = summarizer;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Serve one query end to end. Never returns an error: pipeline
    /// failures become a `success = false` response.
    pub async fn fetch_news(&self, query: &str, options: &FetchOptions) -> NewsResponse {
        let start = Instant::now();
        let request_id = Uuid::new_v4();
        info!(%request_id, query, "Processing news request");

        let result = self.retry.run(|| self.pipeline(query, options)).await;
        let elapsed = start.elapsed().as_secs_f64();

        let metrics = |num_articles: usize| ResponseMetrics {
            response_time: elapsed,
            num_articles,
            from_cache: false,
            parallel: options.parallel,
        };

        match result {
            Ok(articles) if articles.is_empty() => {
                warn!(%request_id, "No articles found");
                NewsResponse::failure("No articles found", metrics(0))
            }
            Ok(articles) => {
                info!(%request_id, count = articles.len(), "Request served");
                let message = format!("Successfully fetched {} articles", articles.len());
                let m = metrics(articles.len());
                NewsResponse::success(articles, message, m)
            }
            Err(e) => {
                error!(%request_id, "Pipeline failed: {}", e);
                NewsResponse::failure(format!("Error: {}", e), metrics(0))
            }
        }
    }

    async fn pipeline(&self, query: &str, options: &FetchOptions) -> Result<Vec<Article>> {
        let intent = self.interpreter.interpret(query).await?;
        let max_results = intent.requested_count.unwrap_or(options.max_results);

        let merged = if options.parallel {
            self.parallel_fetch(&intent).await
        } else {
            self.sequential_fetch(&intent).await
        };

        if merged.is_empty() {
            return Ok(Vec::new());
        }
        info!("Collected {} articles from {} fetchers", merged.len(), self.fetchers.len());

        // Rank a wider slate than requested so enrichment failures still
        // leave enough good articles
        let ranked = self.ranker.rank(merged, query, max_results * 2).await;

        if options.enrich {
            let enriched = self.enricher.enrich(ranked, max_results).await;
            Ok(self.summarizer.summarize(enriched, max_results).await)
        } else {
            let mut plain = ranked;
            plain.truncate(max_results);
            Ok(plain)
        }
    }

    /// Run every fetcher as its own task, each bounded by the fetch
    /// timeout. A slow or panicking fetcher costs its own results only.
    async fn parallel_fetch(&self, intent: &crate::types::Intent) -> Vec<Article> {
        let mut handles = Vec::with_capacity(self.fetchers.len());

        for fetcher in &self.fetchers {
            let fetcher = Arc::clone(fetcher);
            let intent = intent.clone();
            let fetch_timeout = self.fetch_timeout;
            let name = fetcher.name();
            handles.push((
                name,
                tokio::spawn(async move { timeout(fetch_timeout, fetcher.fetch(&intent)).await }),
            ));
        }

        let mut merged = Vec::new();
        for (name, handle) in handles {
            match handle.await {
                Ok(Ok(articles)) => merged.extend(articles),
                Ok(Err(_)) => warn!("Fetcher {} timed out", name),
                Err(e) => warn!("Fetcher {} task failed: {}", name, e),
            }
        }
        merged
    }

    async fn sequential_fetch(&self, intent: &crate::types::Intent) -> Vec<Article> {
        let mut merged = Vec::new();
        for fetcher in &self.fetchers {
            match timeout(self.fetch_timeout, fetcher.fetch(intent)).await {
                Ok(articles) => merged.extend(articles),
                Err(_) => warn!("Fetcher {} timed out", fetcher.name()),
            }
        }
        merged
    }
}
