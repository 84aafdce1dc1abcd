use crate::completion::CompletionClient;
use crate::types::{Article, Result};
use crate::utils::text::{extract_sentences, truncate_chars};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Body text must exceed this many characters to be worth summarizing.
const SUMMARY_THRESHOLD_CHARS: usize = 100;
/// How much article text goes into the prompt.
const PROMPT_BUDGET_CHARS: usize = 3000;

const PLACEHOLDER: &str = "Summary not available.";

/// Generates article summaries via the completion service.
///
/// Articles without enough body text fall back to their description, and a
/// failing service falls back to the leading sentences of the text, so the
/// batch always completes with every article carrying a `full_summary`.
pub struct Summarizer {
    client: Arc<dyn CompletionClient>,
    item_delay: Duration,
}

impl Summarizer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            item_delay: Duration::from_secs(1),
        }
    }

    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    /// Summarize the first `limit` articles; the rest are dropped.
    pub async fn summarize(&self, articles: Vec<Article>, limit: usize) -> Vec<Article> {
        let total = articles.len().min(limit);
        let mut summarized = Vec::with_capacity(total);

        for (index, mut article) in articles.into_iter().take(limit).enumerate() {
            let full_text = article.full_text.clone().unwrap_or_default();

            if full_text.chars().count() > SUMMARY_THRESHOLD_CHARS {
                let summary = match self.generate(&full_text, &article.title).await {
                    Ok(summary) => summary,
                    Err(e) => {
                        warn!("Summary generation failed for article {}: {}", index + 1, e);
                        extract_sentences(&full_text, 3)
                    }
                };
                article.full_summary = Some(summary);
                article.has_ai_summary = true;
            } else if !article.description.is_empty() {
                article.full_summary = Some(article.description.clone());
                article.has_ai_summary = false;
            } else {
                article.full_summary = Some(PLACEHOLDER.to_string());
                article.has_ai_summary = false;
            }

            summarized.push(article);

            if !self.item_delay.is_zero() && index + 1 < total {
                tokio::time::sleep(self.item_delay).await;
            }
        }

        info!("Generated summaries for {} articles", summarized.len());
        summarized
    }

    async fn generate(&self, text: &str, title: &str) -> Result<String> {
        let prompt = format!(
            r#"Generate a comprehensive 4-5 sentence summary of this news article:

Title: {}

Article: {}

Summary should:
- Cover all key points
- Be clear and informative
- Include important details, names, and numbers
- Be written in a professional news style"#,
            title,
            truncate_chars(text, PROMPT_BUDGET_CHARS)
        );

        let response = self.client.complete(&prompt).await?;
        Ok(response.trim().to_string())
    }
}
