use crate::fetch::FeedClient;
use crate::parser::parse_feed_items;
use crate::scrape::discover_image;
use crate::sources::SourceFetcher;
use crate::types::{Article, FetchMethod, Intent};
use crate::utils::text::strip_html;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_SEARCH_URL: &str = "https://news.google.com/rss/search";
const DEFAULT_SOURCE_NAME: &str = "Google News";

/// Fetcher backed by a search-capable aggregator feed.
///
/// Builds a search URL from the intent, resolves each entry's redirect to
/// the publisher page, and splits the aggregator's " - Source" title suffix
/// back out into a source name.
pub struct FeedSearchFetcher {
    client: Arc<FeedClient>,
    base_url: String,
    limit: usize,
    discover_images: bool,
    entry_delay: Duration,
}

impl FeedSearchFetcher {
    pub fn new(client: Arc<FeedClient>, limit: usize) -> Self {
        Self {
            client,
            base_url: DEFAULT_SEARCH_URL.to_string(),
            limit,
            discover_images: false,
            entry_delay: Duration::from_millis(300),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch each resolved article page and look for a lead image.
    /// Off by default since it costs one page request per entry.
    pub fn with_image_discovery(mut self, enabled: bool) -> Self {
        self.discover_images = enabled;
        self
    }

    pub fn with_entry_delay(mut self, delay: Duration) -> Self {
        self.entry_delay = delay;
        self
    }

    fn search_url(&self, intent: &Intent) -> String {
        let mut term = intent.search_term.clone();
        if let Some(location) = &intent.location {
            term = format!("{} {}", term, location);
        }
        format!(
            "{}?q={}&hl=en-IN&gl=IN&ceid=IN:en",
            self.base_url,
            urlencoding::encode(&term)
        )
    }

    async fn entry_image(&self, article_url: &str) -> Option<String> {
        match self.client.fetch_page(article_url).await {
            Ok((200, body)) => discover_image(&body),
            Ok((status, _)) => {
                debug!("Skipping image discovery, HTTP {} for {}", status, article_url);
                None
            }
            Err(e) => {
                debug!("Image discovery failed for {}: {}", article_url, e);
                None
            }
        }
    }
}

#[async_trait]
impl SourceFetcher for FeedSearchFetcher {
    fn name(&self) -> &'static str {
        "feed_search"
    }

    fn method(&self) -> FetchMethod {
        FetchMethod::FeedSearch
    }

    async fn fetch(&self, intent: &Intent) -> Vec<Article> {
        let url = self.search_url(intent);
        info!("Searching feeds: {}", url);

        let content = match self.client.fetch_feed(&url).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Feed search fetch failed: {}", e);
                return Vec::new();
            }
        };

        let items = match parse_feed_items(&content) {
            Ok(items) => items,
            Err(e) => {
                warn!("Feed search parse failed: {}", e);
                return Vec::new();
            }
        };

        let mut articles = Vec::new();
        let total = items.len().min(self.limit);

        for (index, item) in items.into_iter().take(self.limit).enumerate() {
            let raw_title = strip_html(&item.title);

            // Aggregator titles carry the publisher as a " - Source" suffix
            let (title, source) = match raw_title.rsplit_once(" - ") {
                Some((title, source)) => (title.to_string(), source.to_string()),
                None => (
                    raw_title,
                    item.source
                        .clone()
                        .unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_string()),
                ),
            };

            let resolved_url = self.client.resolve_redirect(&item.link).await;

            let mut article = Article::new(
                title,
                strip_html(&item.summary),
                resolved_url.clone(),
                item.published.clone(),
                source,
                FetchMethod::FeedSearch,
            );

            if self.discover_images {
                article.image = self.entry_image(&resolved_url).await;
            }

            articles.push(article);

            if !self.entry_delay.is_zero() && index + 1 < total {
                tokio::time::sleep(self.entry_delay).await;
            }
        }

        info!("Feed search returned {} articles", articles.len());
        articles
    }
}
