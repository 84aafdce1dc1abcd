use crate::types::Article;
use crate::utils::text::normalize_query;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

struct CacheEntry {
    stored_at: Instant,
    articles: Vec<Article>,
}

/// TTL response cache keyed by (normalized query, max_results).
///
/// Expired entries are evicted lazily on read; `sweep` removes them
/// proactively. One entry per key, overwritten on set.
pub struct ResponseCache {
    ttl: Duration,
    entries: RwLock<HashMap<u64, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn key(query: &str, max_results: usize) -> u64 {
        let mut hasher = DefaultHasher::new();
        normalize_query(query).hash(&mut hasher);
        max_results.hash(&mut hasher);
        hasher.finish()
    }

    /// Look up fresh results; expired entries are removed on the way.
    /// Check and eviction happen under one write lock so concurrent
    /// readers agree on what is live.
    pub async fn get(&self, query: &str, max_results: usize) -> Option<Vec<Article>> {
        let key = Self::key(query, max_results);
        let mut entries = self.entries.write().await;

        match entries.get(&key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                debug!("Cache hit for '{}'", query);
                Some(entry.articles.clone())
            }
            Some(_) => {
                debug!("Cache entry expired for '{}'", query);
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub async fn set(&self, query: &str, max_results: usize, articles: Vec<Article>) {
        let key = Self::key(query, max_results);
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                articles,
            },
        );
    }

    /// Drop every expired entry; returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        let removed = before - entries.len();
        if removed > 0 {
            info!("Swept {} expired cache entries", removed);
        }
        removed
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
        info!("Cache cleared");
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
