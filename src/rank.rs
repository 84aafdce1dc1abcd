use crate::completion::{strip_code_fence, CompletionClient};
use crate::types::{Article, Result};
use crate::utils::text::truncate_chars;
use std::sync::Arc;
use tracing::{info, warn};

/// At most this many candidates go into the ranking prompt.
const PROMPT_CANDIDATES: usize = 30;

/// Ranks articles by relevance to the query via the completion service.
///
/// The service returns a permutation of 1-based candidate indices;
/// out-of-range indices are dropped. Any failure falls back to the
/// unranked input order.
pub struct RelevanceRanker {
    client: Arc<dyn CompletionClient>,
}

impl RelevanceRanker {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub async fn rank(&self, mut articles: Vec<Article>, query: &str, top_n: usize) -> Vec<Article> {
        if articles.is_empty() {
            return articles;
        }

        if query.trim().is_empty() {
            warn!("No query provided, returning articles as-is");
            articles.truncate(top_n);
            return articles;
        }

        match self.rank_with_model(&articles, query, top_n).await {
            Ok(ranked) => {
                info!("Ranked {} articles", ranked.len());
                ranked
            }
            Err(e) => {
                warn!("Ranking failed, using input order: {}", e);
                articles.truncate(top_n);
                articles
            }
        }
    }

    async fn rank_with_model(
        &self,
        articles: &[Article],
        query: &str,
        top_n: usize,
    ) -> Result<Vec<Article>> {
        let listing = articles
            .iter()
            .take(PROMPT_CANDIDATES)
            .enumerate()
            .map(|(i, article)| {
                format!(
                    "{}. {} - {}",
                    i + 1,
                    truncate_chars(&article.title, 100),
                    truncate_chars(&article.description, 100)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            r#"User query: "{}"

Rank these articles by relevance (most to least relevant).
Return ONLY a JSON array of article numbers in order: [5, 2, 8, 1, ...]
Include the top {} most relevant articles.

Articles:
{}"#,
            query, top_n, listing
        );

        let response = self.client.complete(&prompt).await?;
        let cleaned = strip_code_fence(&response);
        let indices: Vec<i64> = serde_json::from_str(&cleaned)?;

        let mut ranked = Vec::new();
        for idx in indices {
            if idx >= 1 && (idx as usize) <= articles.len() {
                let mut article = articles[idx as usize - 1].clone();
                article.relevance_rank = Some(ranked.len() as u32 + 1);
                ranked.push(article);
            }
        }

        ranked.truncate(top_n);
        Ok(ranked)
    }
}
