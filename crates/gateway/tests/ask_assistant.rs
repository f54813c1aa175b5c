//! Integration tests for the gateway router.
//!
//! Each test builds its own router over scripted providers and drives it
//! with `tower::ServiceExt::oneshot`.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assistant_common::{
    config::AppConfig,
    errors::{AppError, Result, UpstreamStage},
    retrieval::{MockVectorIndex, RetrievedChunk},
    ChatModel, Embedder, Orchestrator, VectorIndex,
};
use assistant_gateway::{create_router, AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Helpers
// =============================================================================

struct FixedEmbedder {
    fail: bool,
}

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        if self.fail {
            return Err(AppError::upstream(UpstreamStage::Embedding, "quota exceeded"));
        }
        Ok(vec![1.0, 0.0])
    }

    fn model_name(&self) -> &str {
        "fixed"
    }
}

struct FailingIndex;

#[async_trait]
impl VectorIndex for FailingIndex {
    async fn query(&self, _embedding: &[f32], _top_k: usize) -> Result<Vec<RetrievedChunk>> {
        Err(AppError::upstream(UpstreamStage::Retrieval, "timeout"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

#[derive(Default)]
struct ScriptedModel {
    answer: &'static str,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, system: &str, _user: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(system.to_string());
        Ok(self.answer.to_string())
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Answers only after `delay`
struct SlowModel {
    delay: Duration,
}

#[async_trait]
impl ChatModel for SlowModel {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        tokio::time::sleep(self.delay).await;
        Ok("too late".to_string())
    }

    fn model_name(&self) -> &str {
        "slow"
    }
}

fn make_app_with(
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    model: Arc<dyn ChatModel>,
) -> axum::Router {
    let orchestrator = Orchestrator::new(embedder, index, model);
    create_router(AppState::new(AppConfig::default(), orchestrator))
}

fn make_app(answer: &'static str, chunks: Vec<String>) -> (axum::Router, Arc<ScriptedModel>) {
    let model = Arc::new(ScriptedModel { answer, ..Default::default() });
    let app = make_app_with(
        Arc::new(FixedEmbedder { fail: false }),
        Arc::new(MockVectorIndex::new(chunks)),
        model.clone(),
    );
    (app, model)
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// /askAssistant
// =============================================================================

#[tokio::test]
async fn test_answer_happy_path() {
    let (app, _) = make_app("Vision is a platform.", vec!["Vision overview".into()]);

    let resp = app
        .oneshot(post_json(
            "/askAssistant",
            r#"{"question":"What is Vision?","history":[],"locale":"en-us"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({ "assistantMessage": "Vision is a platform.", "status": "DONE" })
    );
}

#[tokio::test]
async fn test_api_prefixed_path() {
    let (app, _) = make_app("ok", vec![]);

    let resp = app
        .oneshot(post_json("/api/askAssistant", r#"{"question":"hi"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_non_post_methods_rejected() {
    for verb in ["GET", "PUT", "DELETE", "PATCH"] {
        let (app, _) = make_app("unused", vec![]);
        let req = Request::builder()
            .method(verb)
            .uri("/askAssistant")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{}", verb);
        assert_eq!(body_json(resp).await, json!({ "message": "Method not supported" }));
    }
}

#[tokio::test]
async fn test_missing_question() {
    let (app, model) = make_app("unused", vec![]);

    let resp = app
        .oneshot(post_json("/askAssistant", r#"{"history":[],"locale":"en-us"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await, json!({ "message": "No question in the request" }));
    assert!(model.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_whitespace_question() {
    let (app, _) = make_app("unused", vec![]);

    let resp = app
        .oneshot(post_json("/askAssistant", r#"{"question":"  \n  "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body() {
    let (app, _) = make_app("unused", vec![]);

    let resp = app
        .oneshot(post_json("/askAssistant", "{not json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await, json!({ "message": "Invalid request body" }));
}

#[tokio::test]
async fn test_body_parsed_without_json_content_type() {
    for content_type in [None, Some("text/plain;charset=UTF-8")] {
        let (app, _) = make_app("Vision is a platform.", vec![]);
        let mut req = Request::post("/askAssistant");
        if let Some(value) = content_type {
            req = req.header("content-type", value);
        }
        let req = req
            .body(Body::from(r#"{"question":"What is Vision?"}"#))
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{:?}", content_type);
        assert_eq!(
            body_json(resp).await,
            json!({ "assistantMessage": "Vision is a platform.", "status": "DONE" })
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_pipeline_times_out_with_error_envelope() {
    let mut config = AppConfig::default();
    config.server.request_timeout_secs = 1;
    let orchestrator = Orchestrator::new(
        Arc::new(FixedEmbedder { fail: false }),
        Arc::new(MockVectorIndex::new(vec![])),
        Arc::new(SlowModel { delay: Duration::from_secs(2) }),
    );
    let app = create_router(AppState::new(config, orchestrator));

    let resp = app
        .oneshot(post_json("/askAssistant", r#"{"question":"What is Vision?"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(resp).await,
        json!({ "message": "Request timed out", "error": "No answer within 1s" })
    );
}

#[tokio::test]
async fn test_empty_retrieval_still_answers() {
    let (app, model) = make_app("Please check the Help Center.", vec![]);

    let resp = app
        .oneshot(post_json("/askAssistant", r#"{"question":"Unknown topic"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let prompts = model.prompts.lock().unwrap();
    assert!(prompts[0].ends_with("Context: No context found"));
}

#[tokio::test]
async fn test_croatian_locale_selects_croatian_template() {
    let (app, model) = make_app("Vision je platforma.", vec!["ctx".into()]);

    let resp = app
        .oneshot(post_json(
            "/askAssistant",
            r#"{"question":"Što je Vision?","history":[["Bok","Pozdrav!"]],"locale":"hr"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let prompts = model.prompts.lock().unwrap();
    assert!(prompts[0].starts_with("Vi ste agentica"));
    assert!(prompts[0].contains("History:"));
}

#[tokio::test]
async fn test_embedding_failure_is_500() {
    let app = make_app_with(
        Arc::new(FixedEmbedder { fail: true }),
        Arc::new(MockVectorIndex::empty()),
        Arc::new(ScriptedModel::default()),
    );

    let resp = app
        .oneshot(post_json("/askAssistant", r#"{"question":"What is Vision?"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Error getting embedding");
    assert_eq!(body["error"], "quota exceeded");
}

#[tokio::test]
async fn test_retrieval_failure_is_500() {
    let app = make_app_with(
        Arc::new(FixedEmbedder { fail: false }),
        Arc::new(FailingIndex),
        Arc::new(ScriptedModel::default()),
    );

    let resp = app
        .oneshot(post_json("/askAssistant", r#"{"question":"What is Vision?"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await["message"], "Error querying vectorstore");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (app, _) = make_app("unused", vec![]);

    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["status"], "healthy");
}

#[tokio::test]
async fn test_ready_reports_missing_keys() {
    let (app, _) = make_app("unused", vec![]);

    let resp = app
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = body_json(resp).await;
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["providers"]["embedding"]["configured"], false);
}

// =============================================================================
// End to end over HTTP providers
// =============================================================================

#[tokio::test]
async fn test_pipeline_over_http_providers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "embedding": [0.1, 0.2] }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [{ "metadata": { "text": "Vision is NSoft's platform." } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "Vision is a platform." } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = AppConfig::default();
    config.embedding.api_key = Some("sk-test".into());
    config.embedding.api_base = Some(server.uri());
    config.completion.api_key = Some("sk-test".into());
    config.completion.api_base = Some(server.uri());
    config.vector_index.api_key = Some("pc-test".into());
    config.vector_index.host = Some(server.uri());

    let app = create_router(AppState::from_config(config).unwrap());

    let resp = app
        .oneshot(post_json("/askAssistant", r#"{"question":"What is Vision?"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({ "assistantMessage": "Vision is a platform.", "status": "DONE" })
    );
}
