use std::num::NonZeroUsize;
use chrono::{Duration, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

#[derive(Clone, Debug)]
pub struct CachedInsight {
    pub text: String,
    pub timestamp: i64,
}

/// Bounded cache of generated insight text, keyed by model and prompt.
/// Entries older than the time-to-live are treated as misses.
pub struct InsightCache {
    entries: Mutex<LruCache<String, CachedInsight>>,
    ttl: Duration,
}

/// Hex SHA-256 of model name and prompt
pub fn cache_key(model: &str, prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update([0u8]);
    hasher.update(prompt.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

impl InsightCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        InsightCache {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn get(&self, model: &str, prompt: &str) -> Option<String> {
        let key = cache_key(model, prompt);
        let mut entries = self.entries.lock();
        let expired = match entries.get(&key) {
            Some(cached) => Utc::now().timestamp() - cached.timestamp > self.ttl.num_seconds(),
            None => {
                tracing::debug!(model = model, "Cache miss");
                return None;
            }
        };
        if expired {
            entries.pop(&key);
            tracing::debug!(model = model, "Cache entry expired");
            return None;
        }
        tracing::debug!(model = model, "Cache hit");
        entries.get(&key).map(|cached| cached.text.clone())
    }

    pub fn put(&self, model: &str, prompt: &str, text: &str) {
        let cached = CachedInsight {
            text: text.to_string(),
            timestamp: Utc::now().timestamp(),
        };
        self.entries.lock().put(cache_key(model, prompt), cached);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
