use serde::{Deserialize, Serialize};

/// Structured interpretation of a free-text news query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub category: Category,
    pub timeframe: Option<String>,
    /// Condensed phrase used when querying search-backed feeds.
    pub search_term: String,
    /// Explicit article count found in the query text, already clamped.
    pub requested_count: Option<usize>,
}

impl Intent {
    pub fn new(search_term: impl Into<String>) -> Self {
        let search_term = search_term.into();
        Self {
            keywords: search_term.split_whitespace().map(str::to_string).collect(),
            location: None,
            category: Category::General,
            timeframe: None,
            search_term,
            requested_count: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technology,
    Business,
    Science,
    Sports,
    Politics,
    General,
}

impl Category {
    /// Parses a category name, treating anything unrecognized as general.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "technology" | "tech" => Category::Technology,
            "business" | "finance" => Category::Business,
            "science" => Category::Science,
            "sports" => Category::Sports,
            "politics" => Category::Politics,
            _ => Category::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Technology => "technology",
            Category::Business => "business",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Politics => "politics",
            Category::General => "general",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which source strategy produced an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMethod {
    FeedSearch,
    CategoryFeed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub url: String,
    /// Publication timestamp as the source rendered it; empty when absent.
    pub published: String,
    pub source: String,
    pub fetch_method: FetchMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_summary: Option<String>,
    /// 1-based position assigned by the relevance ranker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_rank: Option<u32>,
    #[serde(default)]
    pub has_full_content: bool,
    #[serde(default)]
    pub has_ai_summary: bool,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        published: impl Into<String>,
        source: impl Into<String>,
        fetch_method: FetchMethod,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: url.into(),
            published: published.into(),
            source: source.into(),
            fetch_method,
            image: None,
            full_text: None,
            authors: Vec::new(),
            publish_date: None,
            full_summary: None,
            relevance_rank: None,
            has_full_content: false,
            has_ai_summary: false,
        }
    }
}

/// Per-call knobs for a news request.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub max_results: usize,
    pub enrich: bool,
    pub parallel: bool,
    pub use_cache: bool,
    pub force_refresh: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            enrich: true,
            parallel: true,
            use_cache: true,
            force_refresh: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetrics {
    /// Wall-clock seconds spent serving the request.
    pub response_time: f64,
    pub num_articles: usize,
    pub from_cache: bool,
    pub parallel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsResponse {
    pub success: bool,
    pub data: Vec<Article>,
    pub message: String,
    pub metrics: ResponseMetrics,
}

impl NewsResponse {
    pub fn success(data: Vec<Article>, message: impl Into<String>, metrics: ResponseMetrics) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            metrics,
        }
    }

    pub fn failure(message: impl Into<String>, metrics: ResponseMetrics) -> Self {
        Self {
            success: false,
            data: Vec::new(),
            message: message.into(),
            metrics,
        }
    }
}

/// Transport settings for feed and article-page fetching.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub feed_timeout_seconds: u64,
    pub page_timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
    pub max_redirects: usize,
    /// Minimum spacing between requests to the same host.
    pub courtesy_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "news-agent/0.1".to_string(),
            feed_timeout_seconds: 30,
            page_timeout_seconds: 5,
            max_retries: 3,
            retry_delay_seconds: 5,
            max_redirects: 5,
            courtesy_delay_ms: 500,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("Query cannot be empty")]
    EmptyQuery,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Completion service error: {0}")]
    Completion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NewsError>;
