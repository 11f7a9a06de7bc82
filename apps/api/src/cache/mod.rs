//! Content-hash cache in front of the scorer.
//!
//! Keys are the SHA-256 of the extracted resume text, so re-uploading the
//! same document (even under another filename) skips the LLM round trip.
//! A cache is an optimization only: backends log their failures and report
//! a miss instead of failing the request.

mod redis_cache;

use std::num::NonZeroUsize;
use std::sync::Mutex;

use async_trait::async_trait;
use lru::LruCache;
use sha2::{Digest, Sha256};

use crate::models::analysis::ResumeAnalysis;

pub use self::redis_cache::RedisAnalysisCache;

/// Lowercase hex SHA-256 of the extracted text.
pub fn content_hash(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

#[async_trait]
pub trait AnalysisCache: Send + Sync {
    async fn get(&self, hash: &str) -> Option<ResumeAnalysis>;
    async fn put(&self, hash: &str, analysis: &ResumeAnalysis);
}

/// In-process LRU cache. Entries live until evicted or the process exits.
pub struct MemoryAnalysisCache {
    entries: Mutex<LruCache<String, ResumeAnalysis>>,
}

impl MemoryAnalysisCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, ResumeAnalysis>> {
        // A poisoned lock only means another request panicked mid-insert; the map is still usable.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl AnalysisCache for MemoryAnalysisCache {
    async fn get(&self, hash: &str) -> Option<ResumeAnalysis> {
        self.lock().get(hash).cloned()
    }

    async fn put(&self, hash: &str, analysis: &ResumeAnalysis) {
        self.lock().put(hash.to_string(), analysis.clone());
    }
}
