//! Persistence for analyses and users.
//!
//! `PgStore` is used when `DATABASE_URL` is set, `MemoryStore` otherwise.
//! Failures propagate to the caller as `AppError`; nothing here substitutes
//! placeholder data for a failed read.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::analysis::{NewResumeAnalysis, ResumeAnalysis};
use crate::models::user::{NewUser, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn create_analysis(&self, analysis: NewResumeAnalysis) -> Result<ResumeAnalysis, AppError>;

    async fn get_analysis(&self, id: i64) -> Result<Option<ResumeAnalysis>, AppError>;

    /// Most recent analyses first, at most `limit`.
    async fn recent_analyses(&self, limit: usize) -> Result<Vec<ResumeAnalysis>, AppError>;
}

/// Account storage; only exercised by tests until login endpoints exist.
#[allow(dead_code)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Hashes the password before storing. Fails with `AppError::Conflict` on a taken username.
    async fn create_user(&self, user: NewUser) -> Result<User, AppError>;
}

fn username_taken(username: &str) -> AppError {
    AppError::Conflict(format!("Username '{username}' is already taken"))
}
