pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::{handlers, MAX_UPLOAD_BYTES};
use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/resume/analyze", post(handlers::handle_analyze))
        .route(
            "/api/resume/analysis/:id",
            get(handlers::handle_get_analysis),
        )
        .route(
            "/api/resume/analyses/recent",
            get(handlers::handle_recent_analyses),
        )
        .layer(DefaultBodyLimit::max(
            MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use docx_rs::{Docx, Paragraph, Run};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::cache::{AnalysisCache, MemoryAnalysisCache};
    use crate::errors::AppError;
    use crate::extraction::MIME_DOCX;
    use crate::models::analysis::{Feedback, NewResumeAnalysis, ResumeAnalysis, ScoreCard};
    use crate::scoring::ResumeScorer;
    use crate::storage::{AnalysisStore, MemoryStore};

    const BOUNDARY: &str = "X-ATS-TEST-BOUNDARY";

    /// Scorer double: fixed card, configurable resume check, counts score calls.
    struct StubScorer {
        is_resume: bool,
        fail: bool,
        score_calls: AtomicUsize,
    }

    impl StubScorer {
        fn new(is_resume: bool) -> Arc<Self> {
            Arc::new(Self {
                is_resume,
                fail: false,
                score_calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                is_resume: true,
                fail: true,
                score_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ResumeScorer for StubScorer {
        fn backend(&self) -> &'static str {
            "stub"
        }

        async fn is_resume(&self, _text: &str) -> Result<bool, AppError> {
            Ok(self.is_resume)
        }

        async fn score(&self, _text: &str) -> Result<ScoreCard, AppError> {
            self.score_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::Llm("upstream timed out".to_string()));
            }
            Ok(card(81))
        }
    }

    /// Cache whose backend is unreachable: every read misses, every write is dropped.
    #[derive(Default)]
    struct UnreachableCache {
        reads: AtomicUsize,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl AnalysisCache for UnreachableCache {
        async fn get(&self, _hash: &str) -> Option<ResumeAnalysis> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            None
        }

        async fn put(&self, _hash: &str, _analysis: &ResumeAnalysis) {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn card(overall: i32) -> ScoreCard {
        ScoreCard {
            overall_score: overall,
            keywords_score: 75,
            experience_score: 82,
            skills_score: 80,
            education_score: 85,
            formatting_score: 70,
            feedback: Feedback::uniform("Looks solid."),
            improvement_suggestions: vec!["Quantify your impact.".to_string()],
        }
    }

    fn test_state(scorer: Arc<StubScorer>) -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let state = AppState {
            analyses: store.clone(),
            users: store.clone(),
            cache: Arc::new(MemoryAnalysisCache::new(16)),
            scorer,
        };
        (state, store)
    }

    fn docx_bytes(lines: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for line in lines {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*line)));
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    fn multipart_request(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/resume/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn resume_upload() -> Request<Body> {
        let data = docx_bytes(&["Jane Doe", "Experience: Rust engineer", "Education: BSc"]);
        multipart_request("file", "jane.docx", MIME_DOCX, &data)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_upload_returns_analysis_shape() {
        let (state, _) = test_state(StubScorer::new(true));
        let app = build_router(state);

        let response = app.oneshot(resume_upload()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["filename"], "jane.docx");
        assert_eq!(body["fileType"], MIME_DOCX);
        assert_eq!(body["overallScore"], 81);
        assert_eq!(body["experienceScore"], 82);
        for key in ["keywords", "experience", "skills", "education", "formatting"] {
            assert_eq!(body["feedback"][key], "Looks solid.");
        }
        assert_eq!(body["improvementSuggestions"][0], "Quantify your impact.");
        assert!(body["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_repeat_upload_is_served_from_cache() {
        let scorer = StubScorer::new(true);
        let (state, store) = test_state(scorer.clone());
        let app = build_router(state);

        let first = json_body(app.clone().oneshot(resume_upload()).await.unwrap()).await;
        let second = json_body(app.oneshot(resume_upload()).await.unwrap()).await;

        assert_eq!(first, second);
        assert_eq!(scorer.score_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.recent_analyses(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_succeeds_when_cache_is_unreachable() {
        let scorer = StubScorer::new(true);
        let (mut state, store) = test_state(scorer.clone());
        let cache = Arc::new(UnreachableCache::default());
        state.cache = cache.clone();
        let app = build_router(state);

        let first = app.clone().oneshot(resume_upload()).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let second = app.oneshot(resume_upload()).await.unwrap();
        assert_eq!(second.status(), StatusCode::OK);

        assert_eq!(cache.reads.load(Ordering::SeqCst), 2);
        assert_eq!(cache.writes.load(Ordering::SeqCst), 2);
        assert_eq!(scorer.score_calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.recent_analyses(10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_file_type_is_rejected() {
        let (state, _) = test_state(StubScorer::new(true));
        let app = build_router(state);

        let request = multipart_request("file", "notes.txt", "text/plain", b"hello");
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FILE_TYPE");
    }

    #[tokio::test]
    async fn test_missing_file_field_is_rejected() {
        let (state, _) = test_state(StubScorer::new(true));
        let app = build_router(state);

        let request = multipart_request("attachment", "cv.docx", MIME_DOCX, b"ignored");
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"]["message"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_oversize_file_is_rejected() {
        let (state, store) = test_state(StubScorer::new(true));
        let app = build_router(state);

        let data = vec![b'a'; MAX_UPLOAD_BYTES + 1];
        let request = multipart_request("file", "huge.pdf", "application/pdf", &data);
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(store.recent_analyses(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_document_is_unprocessable() {
        let (state, _) = test_state(StubScorer::new(true));
        let app = build_router(state);

        let data = docx_bytes(&["   "]);
        let request = multipart_request("file", "blank.docx", MIME_DOCX, &data);
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_non_resume_gets_zero_scores_without_scoring() {
        let scorer = StubScorer::new(false);
        let (state, _) = test_state(scorer.clone());
        let app = build_router(state);

        let body = json_body(app.oneshot(resume_upload()).await.unwrap()).await;
        assert_eq!(body["overallScore"], 0);
        assert_eq!(body["skillsScore"], 0);
        assert!(body["feedback"]["keywords"]
            .as_str()
            .unwrap()
            .contains("does not appear to be a resume"));
        assert_eq!(scorer.score_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_scorer_failure_is_surfaced() {
        let (state, store) = test_state(StubScorer::failing());
        let app = build_router(state);

        let response = app.oneshot(resume_upload()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"]["code"], "LLM_ERROR");
        assert!(store.recent_analyses(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_analysis_retrievable_by_id() {
        let (state, _) = test_state(StubScorer::new(true));
        let app = build_router(state);

        let created = json_body(app.clone().oneshot(resume_upload()).await.unwrap()).await;
        let response = app.oneshot(get("/api/resume/analysis/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, created);
    }

    #[tokio::test]
    async fn test_invalid_and_unknown_ids() {
        let (state, _) = test_state(StubScorer::new(true));
        let app = build_router(state);

        let response = app.clone().oneshot(get("/api/resume/analysis/abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["message"], "Invalid ID format");

        let response = app.oneshot(get("/api/resume/analysis/999")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["message"], "Analysis not found");
    }

    #[tokio::test]
    async fn test_recent_analyses_newest_first() {
        let (state, store) = test_state(StubScorer::new(true));
        for i in 1..=7 {
            store
                .create_analysis(NewResumeAnalysis {
                    filename: format!("cv-{i}.pdf"),
                    file_type: "application/pdf".to_string(),
                    card: card(60 + i),
                })
                .await
                .unwrap();
        }
        let app = build_router(state);

        let body = json_body(
            app.clone()
                .oneshot(get("/api/resume/analyses/recent?limit=2"))
                .await
                .unwrap(),
        )
        .await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["filename"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["cv-7.pdf", "cv-6.pdf"]);

        let body = json_body(app.oneshot(get("/api/resume/analyses/recent")).await.unwrap()).await;
        assert_eq!(body.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_health_reports_scorer_backend() {
        let (state, _) = test_state(StubScorer::new(true));
        let app = build_router(state);

        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["scorer"], "stub");
    }
}
