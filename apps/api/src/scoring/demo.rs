use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::errors::AppError;
use crate::models::analysis::{Feedback, ScoreCard};
use crate::scoring::{weighted_overall, ResumeScorer};

/// Offline scorer for local development and demos.
///
/// Scores are derived from the SHA-256 of the text, so the same resume
/// always gets the same report. No network access.
pub struct DemoResumeScorer;

#[async_trait]
impl ResumeScorer for DemoResumeScorer {
    fn backend(&self) -> &'static str {
        "demo"
    }

    async fn is_resume(&self, _text: &str) -> Result<bool, AppError> {
        Ok(true)
    }

    async fn score(&self, text: &str) -> Result<ScoreCard, AppError> {
        Ok(demo_card(text))
    }
}

fn demo_card(text: &str) -> ScoreCard {
    let digest = Sha256::digest(text.as_bytes());
    // (base, span): score = base + byte % span
    let pick = |i: usize, base: i32, span: u8| base + i32::from(digest[i] % span);

    let keywords = pick(0, 70, 20);
    let experience = pick(1, 75, 15);
    let skills = pick(2, 65, 25);
    let education = pick(3, 70, 20);
    let formatting = pick(4, 60, 30);

    ScoreCard {
        overall_score: weighted_overall(keywords, experience, skills, education, formatting),
        keywords_score: keywords,
        experience_score: experience,
        skills_score: skills,
        education_score: education,
        formatting_score: formatting,
        feedback: Feedback {
            keywords: "Your resume includes some relevant keywords, but could benefit from more \
                industry-specific terminology. Consider researching job descriptions in your \
                target field for frequently mentioned terms."
                .to_string(),
            experience: "Your work experience is presented chronologically, which is good. Try to \
                quantify achievements with more specific metrics and results where possible."
                .to_string(),
            skills: "Your skills section covers many technical abilities but could be better \
                organized. Consider grouping similar skills and highlighting the ones most \
                relevant to your target position."
                .to_string(),
            education: "Education details are clearly presented. Consider adding relevant \
                coursework or academic achievements if they strengthen your candidacy."
                .to_string(),
            formatting: "The resume has a clean structure but could be more ATS-friendly. Ensure \
                consistent formatting of dates, job titles, and section headers."
                .to_string(),
        },
        improvement_suggestions: [
            "Add more industry-specific keywords and phrases throughout your resume, especially in the summary and skills sections.",
            "Quantify your achievements with specific metrics, percentages, or dollar amounts to demonstrate impact.",
            "Ensure consistent formatting of dates, job titles, and headers for better ATS readability.",
            "Tailor your resume for each application by highlighting experiences most relevant to the specific job.",
            "Consider using a simpler format with standard section headers that are easily recognized by ATS systems.",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
    }
}
