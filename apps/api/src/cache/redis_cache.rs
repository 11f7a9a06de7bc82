use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::{info, warn};

use super::AnalysisCache;
use crate::models::analysis::ResumeAnalysis;

const KEY_PREFIX: &str = "resume-analysis:";

/// Redis-backed cache shared by every API replica. Entries are JSON and expire after `ttl_secs`.
#[derive(Clone)]
pub struct RedisAnalysisCache {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisAnalysisCache {
    pub async fn connect(redis_url: &str, ttl_secs: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Invalid REDIS_URL")?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .context("Failed to connect to Redis")?;
        info!("Redis analysis cache connected (ttl {ttl_secs}s)");
        Ok(Self { conn, ttl_secs })
    }

    fn key(hash: &str) -> String {
        format!("{KEY_PREFIX}{hash}")
    }
}

#[async_trait]
impl AnalysisCache for RedisAnalysisCache {
    async fn get(&self, hash: &str) -> Option<ResumeAnalysis> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = match conn.get(Self::key(hash)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Redis cache read failed for {hash}: {e}");
                return None;
            }
        };

        decode_entry(hash, raw)
    }

    async fn put(&self, hash: &str, analysis: &ResumeAnalysis) {
        let payload = match serde_json::to_string(analysis) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to encode analysis {} for cache: {e}", analysis.id);
                return;
            }
        };

        let mut conn = self.conn.clone();
        let result: redis::RedisResult<()> =
            conn.set_ex(Self::key(hash), payload, self.ttl_secs).await;
        if let Err(e) = result {
            warn!("Redis cache write failed for {hash}: {e}");
        }
    }
}

/// An entry that no longer decodes (e.g. written by an older schema) is a miss.
fn decode_entry(hash: &str, raw: Option<String>) -> Option<ResumeAnalysis> {
    match serde_json::from_str(&raw?) {
        Ok(analysis) => Some(analysis),
        Err(e) => {
            warn!("Discarding undecodable cache entry {hash}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::{Feedback, NewResumeAnalysis, ScoreCard};
    use chrono::Utc;

    fn analysis() -> ResumeAnalysis {
        NewResumeAnalysis {
            filename: "cv.pdf".to_string(),
            file_type: "application/pdf".to_string(),
            card: ScoreCard {
                overall_score: 64,
                keywords_score: 60,
                experience_score: 70,
                skills_score: 65,
                education_score: 60,
                formatting_score: 55,
                feedback: Feedback::uniform("Fine."),
                improvement_suggestions: vec!["Add metrics.".to_string()],
            },
        }
        .into_analysis(3, Utc::now())
    }

    #[test]
    fn test_keys_are_namespaced() {
        assert_eq!(RedisAnalysisCache::key("abc"), "resume-analysis:abc");
    }

    #[test]
    fn test_decode_missing_entry_is_miss() {
        assert_eq!(decode_entry("abc", None), None);
    }

    #[test]
    fn test_decode_garbage_entry_is_miss() {
        assert_eq!(decode_entry("abc", Some("{not json".to_string())), None);
        assert_eq!(decode_entry("abc", Some("{\"id\": 1}".to_string())), None);
    }

    #[test]
    fn test_decode_valid_entry() {
        let stored = analysis();
        let raw = serde_json::to_string(&stored).unwrap();
        assert_eq!(decode_entry("abc", Some(raw)), Some(stored));
    }
}
