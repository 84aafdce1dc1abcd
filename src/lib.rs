pub mod cache;
pub mod completion;
pub mod config;
pub mod enrich;
pub mod fetch;
pub mod metrics;
pub mod orchestrator;
pub mod parser;
pub mod query;
pub mod rank;
pub mod rate_limit;
pub mod retry;
pub mod scrape;
pub mod service;
pub mod sources;
pub mod summarize;
pub mod types;
pub mod utils;

pub use cache::ResponseCache;
pub use completion::{CompletionClient, HttpCompletionClient, MockCompletionClient};
pub use config::Config;
pub use enrich::ContentEnricher;
pub use fetch::FeedClient;
pub use metrics::{MetricsCollector, MetricsSummary};
pub use orchestrator::Orchestrator;
pub use query::QueryInterpreter;
pub use rank::RelevanceRanker;
pub use rate_limit::RateLimiter;
pub use retry::RetryPolicy;
pub use service::NewsService;
pub use sources::{CategoryFeedFetcher, FeedSearchFetcher, SourceFetcher};
pub use summarize::Summarizer;
pub use types::*;
