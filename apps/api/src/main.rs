mod analysis;
mod cache;
mod config;
mod db;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod routes;
mod scoring;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::{AnalysisCache, MemoryAnalysisCache, RedisAnalysisCache};
use crate::config::Config;
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::scoring::{DemoResumeScorer, LlmResumeScorer, ResumeScorer};
use crate::state::AppState;
use crate::storage::{AnalysisStore, MemoryStore, PgStore, UserStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    let state = build_state(&config).await?;

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wires storage, cache and scorer from config.
async fn build_state(config: &Config) -> Result<AppState> {
    let (analyses, users): (Arc<dyn AnalysisStore>, Arc<dyn UserStore>) =
        match &config.database_url {
            Some(url) => {
                let pool = create_pool(url).await?;
                ensure_schema(&pool).await?;
                let store = Arc::new(PgStore::new(pool));
                (store.clone() as Arc<dyn AnalysisStore>, store as Arc<dyn UserStore>)
            }
            None => {
                warn!("DATABASE_URL not set; analyses are kept in memory and lost on restart");
                let store = Arc::new(MemoryStore::new());
                (store.clone() as Arc<dyn AnalysisStore>, store as Arc<dyn UserStore>)
            }
        };

    let cache: Arc<dyn AnalysisCache> = match &config.redis_url {
        Some(url) => Arc::new(RedisAnalysisCache::connect(url, config.cache_ttl_secs).await?),
        None => {
            info!(
                "Using in-memory analysis cache (capacity {})",
                config.cache_capacity
            );
            Arc::new(MemoryAnalysisCache::new(config.cache_capacity))
        }
    };

    let scorer: Arc<dyn ResumeScorer> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.llm_timeout)
                .context("Failed to build LLM HTTP client")?;
            info!(
                "LLM client initialized (model: {}, timeout: {:?})",
                llm_client::MODEL,
                config.llm_timeout
            );
            Arc::new(LlmResumeScorer(llm))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; using the demo scorer with canned feedback");
            Arc::new(DemoResumeScorer)
        }
    };

    Ok(AppState {
        analyses,
        users,
        cache,
        scorer,
    })
}
