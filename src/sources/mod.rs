use crate::types::{Article, FetchMethod, Intent};
use async_trait::async_trait;

pub mod category_feeds;
pub mod feed_search;

pub use category_feeds::CategoryFeedFetcher;
pub use feed_search::FeedSearchFetcher;

/// A strategy for turning an interpreted query into articles.
///
/// Fetchers never fail: upstream trouble is logged and whatever subset
/// succeeded comes back, possibly empty.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Which strategy this fetcher stamps on its articles.
    fn method(&self) -> FetchMethod;

    async fn fetch(&self, intent: &Intent) -> Vec<Article>;
}
