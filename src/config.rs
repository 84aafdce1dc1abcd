use crate::types::{NewsError, Result};
use std::env;

/// Runtime configuration sourced from the environment.
///
/// Everything except the completion API key has a sensible default; a
/// missing key is fatal at startup rather than at first use.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base_url: String,
    pub model: String,
    pub cache_ttl_seconds: u64,
    pub rate_limit_requests: usize,
    pub rate_limit_window_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("NEWS_AGENT_API_KEY")
            .map_err(|_| NewsError::Config("NEWS_AGENT_API_KEY is not set".to_string()))?;

        if api_key.trim().is_empty() {
            return Err(NewsError::Config("NEWS_AGENT_API_KEY is empty".to_string()));
        }

        Ok(Self {
            api_key,
            api_base_url: env::var("NEWS_AGENT_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            model: env::var("NEWS_AGENT_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            cache_ttl_seconds: env_u64("NEWS_AGENT_CACHE_TTL_SECONDS", 1800)?,
            rate_limit_requests: env_u64("NEWS_AGENT_RATE_LIMIT_REQUESTS", 10)? as usize,
            rate_limit_window_seconds: env_u64("NEWS_AGENT_RATE_LIMIT_WINDOW_SECONDS", 60)?,
            retry_attempts: env_u64("NEWS_AGENT_RETRY_ATTEMPTS", 2)? as u32,
            retry_delay_seconds: env_u64("NEWS_AGENT_RETRY_DELAY_SECONDS", 3)?,
        })
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| NewsError::Config(format!("{} must be a number, got '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}
