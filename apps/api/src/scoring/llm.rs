use async_trait::async_trait;
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::prompts::YES_NO_SYSTEM;
use crate::llm_client::LlmClient;
use crate::models::analysis::ScoreCard;
use crate::scoring::prompts::{ATS_SCORE_PROMPT, ATS_SCORE_SYSTEM, RESUME_CHECK_PROMPT};
use crate::scoring::{RawScoreCard, ResumeScorer};

/// ATS scorer backed by Claude.
pub struct LlmResumeScorer(pub LlmClient);

#[async_trait]
impl ResumeScorer for LlmResumeScorer {
    fn backend(&self) -> &'static str {
        "llm"
    }

    async fn is_resume(&self, text: &str) -> Result<bool, AppError> {
        let prompt = RESUME_CHECK_PROMPT.replace("{resume_text}", text);
        let answer = self
            .0
            .call_text(&prompt, YES_NO_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Resume check failed: {e}")))?;
        debug!("Resume check answered {answer:?}");
        Ok(is_affirmative(&answer))
    }

    async fn score(&self, text: &str) -> Result<ScoreCard, AppError> {
        let prompt = ATS_SCORE_PROMPT.replace("{resume_text}", text);
        let raw: RawScoreCard = self
            .0
            .call_json(&prompt, ATS_SCORE_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Resume scoring failed: {e}")))?;
        Ok(raw.normalize())
    }
}

/// "yes", "Yes." and "YES, it is" all count; anything else is a no.
fn is_affirmative(answer: &str) -> bool {
    answer.trim().to_ascii_lowercase().starts_with("yes")
}
