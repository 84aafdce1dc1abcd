use crate::fetch::FeedClient;
use crate::scrape::{extract_article, ExtractedArticle};
use crate::types::{Article, Result};
use crate::utils::text::truncate_chars;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Stored preview length for extracted body text.
const FULL_TEXT_PREVIEW_CHARS: usize = 500;

/// Fetches article pages and attaches body text, byline metadata and a lead
/// image. Extraction trouble never fails the batch; the affected article
/// passes through with `has_full_content = false`.
pub struct ContentEnricher {
    client: Arc<FeedClient>,
    item_delay: Duration,
}

impl ContentEnricher {
    pub fn new(client: Arc<FeedClient>) -> Self {
        Self {
            client,
            item_delay: Duration::from_millis(500),
        }
    }

    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    /// Enrich the first `limit` articles; the rest are dropped.
    pub async fn enrich(&self, articles: Vec<Article>, limit: usize) -> Vec<Article> {
        let total = articles.len().min(limit);
        let mut enriched = Vec::with_capacity(total);

        for (index, mut article) in articles.into_iter().take(limit).enumerate() {
            if article.url.is_empty() {
                warn!("Article {} has no URL, skipping extraction", index + 1);
                article.has_full_content = false;
                enriched.push(article);
                continue;
            }

            match self.extract(&article.url).await {
                Ok(extracted) if !extracted.text.is_empty() => {
                    article.full_text = Some(truncate_chars(&extracted.text, FULL_TEXT_PREVIEW_CHARS));
                    article.authors = extracted.authors;
                    article.publish_date = extracted.publish_date;
                    if article.image.is_none() {
                        article.image = extracted.top_image;
                    }
                    article.has_full_content = true;
                }
                Ok(_) => {
                    debug!("No extractable content at {}", article.url);
                    article.has_full_content = false;
                }
                Err(e) => {
                    warn!("Extraction failed for {}: {}", article.url, e);
                    article.has_full_content = false;
                }
            }

            enriched.push(article);

            if !self.item_delay.is_zero() && index + 1 < total {
                tokio::time::sleep(self.item_delay).await;
            }
        }

        info!("Enriched {} articles", enriched.len());
        enriched
    }

    async fn extract(&self, url: &str) -> Result<ExtractedArticle> {
        let (status, body) = self.client.fetch_page(url).await?;
        if status != 200 {
            debug!("HTTP {} fetching {}", status, url);
            return Ok(ExtractedArticle::default());
        }
        Ok(extract_article(&body))
    }
}
