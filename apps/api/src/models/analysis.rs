use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-text feedback for each scored category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub keywords: String,
    pub experience: String,
    pub skills: String,
    pub education: String,
    pub formatting: String,
}

impl Feedback {
    /// The same message for every category.
    pub fn uniform(message: &str) -> Self {
        Self {
            keywords: message.to_string(),
            experience: message.to_string(),
            skills: message.to_string(),
            education: message.to_string(),
            formatting: message.to_string(),
        }
    }
}

/// Scores (0–100), feedback and suggestions for one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    pub overall_score: i32,
    pub keywords_score: i32,
    pub experience_score: i32,
    pub skills_score: i32,
    pub education_score: i32,
    pub formatting_score: i32,
    pub feedback: Feedback,
    pub improvement_suggestions: Vec<String>,
}

/// A stored analysis as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub id: i64,
    pub filename: String,
    pub file_type: String,
    #[serde(flatten)]
    pub card: ScoreCard,
    pub created_at: DateTime<Utc>,
}

/// An analysis that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewResumeAnalysis {
    pub filename: String,
    pub file_type: String,
    pub card: ScoreCard,
}

impl NewResumeAnalysis {
    pub fn into_analysis(self, id: i64, created_at: DateTime<Utc>) -> ResumeAnalysis {
        ResumeAnalysis {
            id,
            filename: self.filename,
            file_type: self.file_type,
            card: self.card,
            created_at,
        }
    }
}
