use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use super::{username_taken, AnalysisStore, UserStore};
use crate::errors::AppError;
use crate::models::analysis::{NewResumeAnalysis, ResumeAnalysis};
use crate::models::user::{hash_password, NewUser, User};

#[derive(Default)]
struct Tables {
    analyses: BTreeMap<i64, ResumeAnalysis>,
    users: BTreeMap<i64, User>,
    next_analysis_id: i64,
    next_user_id: i64,
}

/// Process-local store. Ids start at 1 and only grow.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn create_analysis(&self, analysis: NewResumeAnalysis) -> Result<ResumeAnalysis, AppError> {
        let mut tables = self.write();
        tables.next_analysis_id += 1;
        let id = tables.next_analysis_id;
        let stored = analysis.into_analysis(id, Utc::now());
        tables.analyses.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_analysis(&self, id: i64) -> Result<Option<ResumeAnalysis>, AppError> {
        Ok(self.read().analyses.get(&id).cloned())
    }

    async fn recent_analyses(&self, limit: usize) -> Result<Vec<ResumeAnalysis>, AppError> {
        let tables = self.read();
        let mut analyses: Vec<ResumeAnalysis> = tables.analyses.values().cloned().collect();
        // ids break ties between analyses created within the same clock tick
        analyses.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        analyses.truncate(limit);
        Ok(analyses)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.read().users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.write();
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(username_taken(&user.username));
        }
        tables.next_user_id += 1;
        let stored = User {
            id: tables.next_user_id,
            username: user.username,
            password: hash_password(&user.password),
        };
        tables.users.insert(stored.id, stored.clone());
        Ok(stored)
    }
}
