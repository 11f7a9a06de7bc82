use std::sync::Arc;

use crate::cache::AnalysisCache;
use crate::scoring::ResumeScorer;
use crate::storage::{AnalysisStore, UserStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub analyses: Arc<dyn AnalysisStore>,
    /// User store reserved for account endpoints; no route reads it yet.
    #[allow(dead_code)]
    pub users: Arc<dyn UserStore>,
    pub cache: Arc<dyn AnalysisCache>,
    /// Pluggable scorer. LLM by default, demo when no API key is configured.
    pub scorer: Arc<dyn ResumeScorer>,
}
