use crate::fetch::FeedClient;
use crate::parser::parse_feed_items;
use crate::sources::SourceFetcher;
use crate::types::{Article, Category, FetchMethod, Intent};
use crate::utils::text::{prettify_source, strip_html};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Curated feeds, keyed by the snake_case names used in category mappings.
const FEEDS: &[(&str, &str)] = &[
    ("bbc_world", "http://feeds.bbci.co.uk/news/world/rss.xml"),
    ("bbc_tech", "http://feeds.bbci.co.uk/news/technology/rss.xml"),
    ("bbc_business", "http://feeds.bbci.co.uk/news/business/rss.xml"),
    ("bbc_science", "http://feeds.bbci.co.uk/news/science_and_environment/rss.xml"),
    ("reuters_world", "https://www.reutersagency.com/feed/?taxonomy=best-topics&post_type=best"),
    ("al_jazeera", "https://www.aljazeera.com/xml/rss/all.xml"),
    ("techcrunch", "https://techcrunch.com/feed/"),
    ("the_verge", "https://www.theverge.com/rss/index.xml"),
    ("ars_technica", "https://feeds.arstechnica.com/arstechnica/index"),
];

/// General-purpose feeds mixed into every non-general category.
const GENERAL_FEEDS: &[&str] = &["bbc_world", "al_jazeera"];

/// Fetcher that pulls the curated feeds mapped to the intent's category.
pub struct CategoryFeedFetcher {
    client: Arc<FeedClient>,
    per_feed_limit: usize,
    feed_delay: Duration,
}

impl CategoryFeedFetcher {
    pub fn new(client: Arc<FeedClient>, per_feed_limit: usize) -> Self {
        Self {
            client,
            per_feed_limit,
            feed_delay: Duration::from_millis(500),
        }
    }

    pub fn with_feed_delay(mut self, delay: Duration) -> Self {
        self.feed_delay = delay;
        self
    }

    /// Feed names for a category: the mapped feeds plus the general-purpose
    /// ones, deduplicated while keeping first-seen order.
    fn feeds_for(category: Category) -> Vec<&'static str> {
        let mapped: &[&str] = match category {
            Category::Technology => &["bbc_tech", "techcrunch", "the_verge", "ars_technica"],
            Category::Business => &["bbc_business", "reuters_world"],
            Category::Science => &["bbc_science"],
            Category::Sports => &["bbc_world"],
            Category::Politics => &["bbc_world", "al_jazeera"],
            Category::General => &["bbc_world", "al_jazeera", "reuters_world"],
        };

        let mut names: Vec<&'static str> = Vec::new();
        for name in mapped.iter().chain(GENERAL_FEEDS) {
            if !names.contains(name) {
                names.push(name);
            }
        }
        names
    }

    fn feed_url(name: &str) -> Option<&'static str> {
        FEEDS.iter().find(|(n, _)| *n == name).map(|(_, url)| *url)
    }

    async fn fetch_one(&self, name: &'static str, url: &str) -> Vec<Article> {
        let content = match self.client.fetch_feed(url).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Category feed {} failed: {}", name, e);
                return Vec::new();
            }
        };

        let items = match parse_feed_items(&content) {
            Ok(items) => items,
            Err(e) => {
                warn!("Category feed {} parse failed: {}", name, e);
                return Vec::new();
            }
        };

        items
            .into_iter()
            .take(self.per_feed_limit)
            .map(|item| {
                let mut article = Article::new(
                    strip_html(&item.title),
                    strip_html(&item.summary),
                    item.link,
                    item.published,
                    prettify_source(name),
                    FetchMethod::CategoryFeed,
                );
                article.image = item.image;
                article
            })
            .collect()
    }
}

#[async_trait]
impl SourceFetcher for CategoryFeedFetcher {
    fn name(&self) -> &'static str {
        "category_feeds"
    }

    fn method(&self) -> FetchMethod {
        FetchMethod::CategoryFeed
    }

    async fn fetch(&self, intent: &Intent) -> Vec<Article> {
        let names = Self::feeds_for(intent.category);
        info!(
            "Fetching {} category feeds for '{}'",
            names.len(),
            intent.category
        );

        let mut articles = Vec::new();
        let total = names.len();

        for (index, name) in names.into_iter().enumerate() {
            let Some(url) = Self::feed_url(name) else {
                warn!("Unknown feed name: {}", name);
                continue;
            };

            articles.extend(self.fetch_one(name, url).await);

            if !self.feed_delay.is_zero() && index + 1 < total {
                tokio::time::sleep(self.feed_delay).await;
            }
        }

        info!("Category feeds returned {} articles", articles.len());
        articles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn technology_unions_general_feeds_without_duplicates() {
        let names = CategoryFeedFetcher::feeds_for(Category::Technology);
        assert_eq!(
            names,
            vec!["bbc_tech", "techcrunch", "the_verge", "ars_technica", "bbc_world", "al_jazeera"]
        );
    }

    #[test]
    fn politics_deduplicates_overlap_with_general() {
        let names = CategoryFeedFetcher::feeds_for(Category::Politics);
        assert_eq!(names, vec!["bbc_world", "al_jazeera"]);
    }

    #[test]
    fn every_mapped_feed_has_a_url() {
        for category in [
            Category::Technology,
            Category::Business,
            Category::Science,
            Category::Sports,
            Category::Politics,
            Category::General,
        ] {
            for name in CategoryFeedFetcher::feeds_for(category) {
                assert!(CategoryFeedFetcher::feed_url(name).is_some(), "missing {}", name);
            }
        }
    }
}
