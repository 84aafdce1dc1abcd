use anyhow::Context;
use clap::Parser;
use news_agent::{
    CategoryFeedFetcher, Config, FeedClient, FeedSearchFetcher, FetchConfig, FetchOptions,
    HttpCompletionClient, NewsService, Orchestrator, RateLimiter, ResponseCache, RetryPolicy,
    SourceFetcher,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Fetch, rank and summarize news for a free-text query
#[derive(Parser, Debug)]
#[command(name = "news-agent", version, about)]
struct Cli {
    /// The news query, e.g. "latest AI chip news"
    #[arg(required = true)]
    query: Vec<String>,

    /// Maximum number of articles to return
    #[arg(long, default_value_t = 5)]
    max_results: usize,

    /// Skip content extraction and summarization
    #[arg(long)]
    no_enrich: bool,

    /// Run source fetchers one after another instead of concurrently
    #[arg(long)]
    sequential: bool,

    /// Bypass the response cache entirely
    #[arg(long)]
    no_cache: bool,

    /// Fetch fresh results even when cached ones exist
    #[arg(long)]
    refresh: bool,

    /// Print collected metrics after the query
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("loading configuration")?;

    let completion = Arc::new(HttpCompletionClient::new(
        &config.api_key,
        &config.api_base_url,
        &config.model,
    ));
    let feed_client = Arc::new(FeedClient::new(FetchConfig::default())?);

    let fetchers: Vec<Arc<dyn SourceFetcher>> = vec![
        Arc::new(FeedSearchFetcher::new(feed_client.clone(), 10)),
        Arc::new(CategoryFeedFetcher::new(feed_client.clone(), 8)),
    ];

    let retry = RetryPolicy::new(
        config.retry_attempts,
        Duration::from_secs(config.retry_delay_seconds),
    );
    let orchestrator = Orchestrator::new(completion, feed_client, fetchers, retry);

    let service = NewsService::new(
        orchestrator,
        ResponseCache::new(Duration::from_secs(config.cache_ttl_seconds)),
        RateLimiter::new(
            config.rate_limit_requests,
            Duration::from_secs(config.rate_limit_window_seconds),
        ),
    );

    let query = cli.query.join(" ");
    let options = FetchOptions {
        max_results: cli.max_results,
        enrich: !cli.no_enrich,
        parallel: !cli.sequential,
        use_cache: !cli.no_cache,
        force_refresh: cli.refresh,
    };

    info!("Running query: {}", query);
    let response = service.fetch_news(&query, options).await;

    if !response.success {
        println!("{}", response.message);
    } else {
        println!(
            "{} ({:.2}s{})",
            response.message,
            response.metrics.response_time,
            if response.metrics.from_cache { ", cached" } else { "" }
        );
        println!();

        for (i, article) in response.data.iter().enumerate() {
            println!("{}. {} [{}]", i + 1, article.title, article.source);
            if !article.published.is_empty() {
                println!("   {}", article.published);
            }
            println!("   {}", article.url);
            if let Some(summary) = &article.full_summary {
                println!("   {}", summary);
            } else if !article.description.is_empty() {
                println!("   {}", article.description);
            }
            println!();
        }
    }

    if cli.stats {
        let summary = service.metrics().await;
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
