//! Resume scoring: pluggable, trait-based ATS scorer.
//!
//! Default: `LlmResumeScorer` (Claude, via `llm_client`).
//! Fallback: `DemoResumeScorer` when no API key is configured.
//!
//! `AppState` holds an `Arc<dyn ResumeScorer>`, picked at startup from config.

pub mod demo;
pub mod llm;
pub mod prompts;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::analysis::{Feedback, ScoreCard};

pub use demo::DemoResumeScorer;
pub use llm::LlmResumeScorer;

pub const NO_FEEDBACK: &str = "No feedback provided.";
pub const NO_SUGGESTIONS: &str = "No suggestions provided.";

const NOT_A_RESUME_FEEDBACK: &str = "This document does not appear to be a resume. \
    Please upload a valid resume (CV) for analysis.";
const NOT_A_RESUME_SUGGESTION: &str = "Please upload a resume or CV document for accurate analysis.";

/// Category weights for the overall score: keywords, experience, skills, education, formatting.
const CATEGORY_WEIGHTS: [f64; 5] = [0.25, 0.30, 0.20, 0.15, 0.10];

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching the pipeline
/// or handlers.
#[async_trait]
pub trait ResumeScorer: Send + Sync {
    /// Short label for logs: "llm" | "demo".
    fn backend(&self) -> &'static str;

    /// Whether the text looks like a resume or CV at all.
    async fn is_resume(&self, text: &str) -> Result<bool, AppError>;

    async fn score(&self, text: &str) -> Result<ScoreCard, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Score cards
// ────────────────────────────────────────────────────────────────────────────

impl ScoreCard {
    /// Zero-score card returned for documents that are not resumes.
    pub fn not_a_resume() -> Self {
        Self {
            overall_score: 0,
            keywords_score: 0,
            experience_score: 0,
            skills_score: 0,
            education_score: 0,
            formatting_score: 0,
            feedback: Feedback::uniform(NOT_A_RESUME_FEEDBACK),
            improvement_suggestions: vec![NOT_A_RESUME_SUGGESTION.to_string()],
        }
    }
}

/// Weighted average of the five category scores, floored.
pub fn weighted_overall(keywords: i32, experience: i32, skills: i32, education: i32, formatting: i32) -> i32 {
    let scores = [keywords, experience, skills, education, formatting];
    let total: f64 = scores
        .iter()
        .zip(CATEGORY_WEIGHTS)
        .map(|(score, weight)| *score as f64 * weight)
        .sum();
    // weights sum to 1.0 but not exactly in f64; nudge before flooring
    (total + 1e-9).floor() as i32
}

/// A score card as the model returns it: every field optional, every field
/// of any JSON type.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawScoreCard {
    pub overall_score: Option<Value>,
    pub keywords_score: Option<Value>,
    pub experience_score: Option<Value>,
    pub skills_score: Option<Value>,
    pub education_score: Option<Value>,
    pub formatting_score: Option<Value>,
    pub feedback: Option<Value>,
    pub improvement_suggestions: Option<Value>,
}

impl RawScoreCard {
    /// Clamps scores to 0–100 and fills missing feedback and suggestions.
    pub fn normalize(self) -> ScoreCard {
        let keywords = score_or_zero(self.keywords_score.as_ref());
        let experience = score_or_zero(self.experience_score.as_ref());
        let skills = score_or_zero(self.skills_score.as_ref());
        let education = score_or_zero(self.education_score.as_ref());
        let formatting = score_or_zero(self.formatting_score.as_ref());

        let overall = self
            .overall_score
            .as_ref()
            .and_then(lenient_score)
            .unwrap_or_else(|| weighted_overall(keywords, experience, skills, education, formatting));

        let feedback = match self.feedback {
            Some(Value::Object(map)) => Feedback {
                keywords: feedback_text(map.get("keywords")),
                experience: feedback_text(map.get("experience")),
                skills: feedback_text(map.get("skills")),
                education: feedback_text(map.get("education")),
                formatting: feedback_text(map.get("formatting")),
            },
            _ => Feedback::uniform(NO_FEEDBACK),
        };

        let mut suggestions: Vec<String> = match self.improvement_suggestions {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.trim().to_string()),
                    _ => None,
                })
                .collect(),
            Some(Value::String(s)) => vec![s.trim().to_string()],
            _ => Vec::new(),
        };
        suggestions.retain(|s| !s.is_empty());
        if suggestions.is_empty() {
            suggestions.push(NO_SUGGESTIONS.to_string());
        }

        ScoreCard {
            overall_score: overall,
            keywords_score: keywords,
            experience_score: experience,
            skills_score: skills,
            education_score: education,
            formatting_score: formatting,
            feedback,
            improvement_suggestions: suggestions,
        }
    }
}

fn score_or_zero(value: Option<&Value>) -> i32 {
    value.and_then(lenient_score).unwrap_or(0)
}

/// Accepts integers, floats and numeric strings; rounds and clamps to 0–100.
fn lenient_score(value: &Value) -> Option<i32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(0.0, 100.0) as i32)
}

/// Feedback entries are strings; a list of strings is joined into one line.
fn feedback_text(value: Option<&Value>) -> String {
    let text = match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    };
    if text.is_empty() {
        NO_FEEDBACK.to_string()
    } else {
        text
    }
}
