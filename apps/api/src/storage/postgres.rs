use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;

use super::{username_taken, AnalysisStore, UserStore};
use crate::errors::AppError;
use crate::models::analysis::{Feedback, NewResumeAnalysis, ResumeAnalysis, ScoreCard};
use crate::models::user::{hash_password, NewUser, User};

/// PostgreSQL-backed store. Tables are created by `db::ensure_schema`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AnalysisRow {
    id: i64,
    filename: String,
    file_type: String,
    overall_score: i32,
    keywords_score: i32,
    experience_score: i32,
    skills_score: i32,
    education_score: i32,
    formatting_score: i32,
    feedback: Json<Feedback>,
    improvement_suggestions: Json<Vec<String>>,
    created_at: DateTime<Utc>,
}

impl From<AnalysisRow> for ResumeAnalysis {
    fn from(row: AnalysisRow) -> Self {
        ResumeAnalysis {
            id: row.id,
            filename: row.filename,
            file_type: row.file_type,
            card: ScoreCard {
                overall_score: row.overall_score,
                keywords_score: row.keywords_score,
                experience_score: row.experience_score,
                skills_score: row.skills_score,
                education_score: row.education_score,
                formatting_score: row.formatting_score,
                feedback: row.feedback.0,
                improvement_suggestions: row.improvement_suggestions.0,
            },
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AnalysisStore for PgStore {
    async fn create_analysis(&self, analysis: NewResumeAnalysis) -> Result<ResumeAnalysis, AppError> {
        let card = &analysis.card;
        let row = sqlx::query_as::<_, AnalysisRow>(
            r#"
            INSERT INTO resume_analysis
                (filename, file_type, overall_score, keywords_score, experience_score,
                 skills_score, education_score, formatting_score, feedback, improvement_suggestions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&analysis.filename)
        .bind(&analysis.file_type)
        .bind(card.overall_score)
        .bind(card.keywords_score)
        .bind(card.experience_score)
        .bind(card.skills_score)
        .bind(card.education_score)
        .bind(card.formatting_score)
        .bind(Json(&card.feedback))
        .bind(Json(&card.improvement_suggestions))
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted resume analysis {} ({})", row.id, row.filename);
        Ok(row.into())
    }

    async fn get_analysis(&self, id: i64) -> Result<Option<ResumeAnalysis>, AppError> {
        let row = sqlx::query_as::<_, AnalysisRow>("SELECT * FROM resume_analysis WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn recent_analyses(&self, limit: usize) -> Result<Vec<ResumeAnalysis>, AppError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, AnalysisRow>(
            "SELECT * FROM resume_analysis ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(
            sqlx::query_as::<_, UserRow>("SELECT id, username, password FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .map(Into::into),
        )
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .map(Into::into))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username, password) VALUES ($1, $2) RETURNING id, username, password",
        )
        .bind(&user.username)
        .bind(hash_password(&user.password))
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(username_taken(&user.username))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password: row.password,
        }
    }
}
