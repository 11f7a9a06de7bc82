// Scoring LLM prompt templates.
// All prompts for the scoring module are defined here.

pub const RESUME_CHECK_PROMPT: &str = "\
Is the following document a resume or CV? Reply only with 'yes' or 'no'.

Document:
{resume_text}";

pub const ATS_SCORE_SYSTEM: &str = "\
You are an expert ATS (Applicant Tracking System) resume analyzer. \
Score the resume realistically, not overly strict. \
Most good resumes should score between 60 and 85. \
Be encouraging and provide actionable feedback for each section. \
You MUST respond with valid JSON only, no markdown fences, no explanations.";

pub const ATS_SCORE_PROMPT: &str = r#"Evaluate the following resume as a real ATS would, using these criteria:
- Keyword & phrase match for the target job
- Work experience relevance and quantification
- Skills match (technical and soft)
- Education completeness
- Formatting & structure (ATS-friendly, no images, simple layout, clear sections)

For each category, give a score out of 100.
For each category, provide 1-2 sentences of feedback.

OUTPUT SCHEMA (return exactly this structure):
{
  "overallScore": number,
  "keywordsScore": number,
  "experienceScore": number,
  "skillsScore": number,
  "educationScore": number,
  "formattingScore": number,
  "feedback": {
    "keywords": "string",
    "experience": "string",
    "skills": "string",
    "education": "string",
    "formatting": "string"
  },
  "improvementSuggestions": ["string"]  // 3-5 actionable suggestions
}

RESUME:
{resume_text}"#;
