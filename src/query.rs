use crate::completion::{strip_code_fence, CompletionClient};
use crate::types::{Category, Intent, NewsError, Result};
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

const MAX_REQUESTED: usize = 50;

/// Patterns for an explicit article count, tried in priority order.
const COUNT_PATTERNS: &[&str] = &[
    r"(\d+)\s*(?:articles?|news|results?)",
    r"(?:give|show|find|get)\s+(?:me\s+)?(\d+)",
    r"(\d+)\s+(?:latest|recent|top)",
    r"(?:latest|recent)?\s*(\d+)\s+(?:news|articles?)",
    r"^(\d+)\s+",
];

/// Shape of the structured reply we ask the completion service for.
#[derive(Debug, Deserialize)]
struct RawIntent {
    keywords: Option<Vec<String>>,
    location: Option<String>,
    category: Option<String>,
    timeframe: Option<String>,
    search_term: Option<String>,
}

/// Turns free-text queries into a structured [`Intent`].
///
/// The completion service does the heavy lifting; when it fails the
/// heuristic fallback still produces a usable intent, so interpretation
/// only errors on an empty query.
pub struct QueryInterpreter {
    client: Arc<dyn CompletionClient>,
    count_patterns: Vec<Regex>,
}

impl QueryInterpreter {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        let count_patterns = COUNT_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("count pattern"))
            .collect();

        Self {
            client,
            count_patterns,
        }
    }

    pub async fn interpret(&self, query: &str) -> Result<Intent> {
        let query = query.trim();
        if query.is_empty() {
            return Err(NewsError::EmptyQuery);
        }

        let requested_count = self.extract_count(query);

        let mut intent = match self.parse_with_model(query).await {
            Ok(intent) => intent,
            Err(e) => {
                warn!("Model parse failed, using heuristic fallback: {}", e);
                heuristic_parse(query)
            }
        };
        intent.requested_count = requested_count;

        info!(
            "Interpreted query: category={}, location={:?}, count={:?}",
            intent.category, intent.location, intent.requested_count
        );
        Ok(intent)
    }

    /// Explicit article count from the query text, clamped to the valid
    /// range. Oversized requests clamp to the maximum; zero never matches.
    fn extract_count(&self, query: &str) -> Option<usize> {
        let lowered = query.to_lowercase();

        for pattern in &self.count_patterns {
            if let Some(captures) = pattern.captures(&lowered) {
                if let Some(count) = captures.get(1).and_then(|m| m.as_str().parse::<usize>().ok()) {
                    if (1..=MAX_REQUESTED).contains(&count) {
                        debug!("Extracted count from query: {}", count);
                        return Some(count);
                    }
                    if count > MAX_REQUESTED {
                        warn!("Requested {} articles, clamping to {}", count, MAX_REQUESTED);
                        return Some(MAX_REQUESTED);
                    }
                    // zero: keep trying the remaining patterns
                }
            }
        }

        None
    }

    async fn parse_with_model(&self, query: &str) -> Result<Intent> {
        let prompt = format!(
            r#"Analyze this news search query and extract structured information:

Query: "{}"

Return ONLY a JSON object with these fields:
{{
    "keywords": ["list", "of", "keywords"],
    "location": "country/state/city or null",
    "category": "technology/sports/politics/business or general",
    "timeframe": "latest/today/recent or null",
    "search_term": "optimized search term for news search"
}}"#,
            query
        );

        let response = self.client.complete(&prompt).await?;
        let cleaned = strip_code_fence(&response);
        let raw: RawIntent = serde_json::from_str(&cleaned)?;

        Ok(Intent {
            keywords: raw
                .keywords
                .unwrap_or_else(|| query.split_whitespace().map(str::to_string).collect()),
            location: raw.location.filter(|l| !l.trim().is_empty()),
            category: raw
                .category
                .map(|c| Category::parse(&c))
                .unwrap_or(Category::General),
            timeframe: raw.timeframe,
            search_term: raw.search_term.unwrap_or_else(|| query.to_string()),
            requested_count: None,
        })
    }
}

/// Keyword-bucket parse used when the completion service is unavailable.
fn heuristic_parse(query: &str) -> Intent {
    let lowered = query.to_lowercase();
    let words: Vec<String> = lowered.split_whitespace().map(str::to_string).collect();

    let contains_any =
        |candidates: &[&str]| candidates.iter().any(|c| words.iter().any(|w| w == c));

    let category = if contains_any(&["tech", "technology", "ai", "software"]) {
        Category::Technology
    } else if contains_any(&["business", "economy", "stock", "market"]) {
        Category::Business
    } else if contains_any(&["sports", "cricket", "football", "game"]) {
        Category::Sports
    } else if contains_any(&["politics", "election", "government"]) {
        Category::Politics
    } else {
        Category::General
    };

    let known_cities = [
        "mumbai", "delhi", "bangalore", "chennai", "kolkata", "hyderabad", "pune", "ahmedabad",
        "surat", "jaipur",
    ];
    let location = known_cities.iter().find(|city| lowered.contains(*city)).map(|city| {
        let mut chars = city.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    });

    Intent {
        keywords: words,
        location,
        category,
        timeframe: Some("recent".to_string()),
        search_term: query.to_string(),
        requested_count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_detects_technology_and_location() {
        let intent = heuristic_parse("latest AI chip news from Mumbai");
        assert_eq!(intent.category, Category::Technology);
        assert_eq!(intent.location.as_deref(), Some("Mumbai"));
        assert_eq!(intent.search_term, "latest AI chip news from Mumbai");
    }

    #[test]
    fn heuristic_defaults_to_general() {
        let intent = heuristic_parse("what happened today");
        assert_eq!(intent.category, Category::General);
        assert!(intent.location.is_none());
    }
}
