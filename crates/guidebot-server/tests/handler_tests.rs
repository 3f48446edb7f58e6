use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use guidebot_answer::{PipelineOptions, QueryPipeline, APOLOGY};
use guidebot_core::{Chunk, Document, SourceType};
use guidebot_embed::FakeEmbedder;
use guidebot_llm::{GenerationConfig, LlmClient, LlmError};
use guidebot_server::handlers::{self, QueryRequest};
use guidebot_server::AppState;
use guidebot_vector::{SharedStore, VectorStore};

/// Says "yes" to every relevance check and echoes a fixed answer otherwise.
struct AgreeableLlm;

#[async_trait]
impl LlmClient for AgreeableLlm {
    fn name(&self) -> &str {
        "agreeable"
    }

    async fn generate(&self, prompt: &str, _config: &GenerationConfig) -> Result<String, LlmError> {
        if prompt.contains("checks if context is relevant") {
            Ok("yes".into())
        } else if prompt.contains("Context:\n") {
            Ok(" grounded answer ".into())
        } else {
            Ok("direct answer".into())
        }
    }
}

struct SilentLlm;

#[async_trait]
impl LlmClient for SilentLlm {
    fn name(&self) -> &str {
        "silent"
    }

    async fn generate(&self, _prompt: &str, _config: &GenerationConfig) -> Result<String, LlmError> {
        Err(LlmError::MissingApiKey { provider: "silent", env_var: "NONE" })
    }
}

fn empty_store(dir: &Path) -> VectorStore {
    VectorStore::new(Arc::new(FakeEmbedder::new(32)), dir.join("index.bin"), dir.join("meta.json"))
}

fn delhi_chunks() -> Vec<Chunk> {
    ["Red Fort is in Old Delhi", "Lotus Temple is a Bahai house of worship"]
        .iter()
        .map(|t| Chunk::new(*t, Document::new(*t, "Delhi Tourism PDF", SourceType::Pdf).metadata))
        .collect()
}

fn state_with(store: SharedStore, llm: Arc<dyn LlmClient>) -> Arc<AppState> {
    let pipeline = QueryPipeline::new(Arc::new(store.clone()), llm, PipelineOptions::default());
    Arc::new(AppState::new(pipeline, store, "Welcome to the Tourism Chatbot API"))
}

async fn body_json(response: impl IntoResponse) -> (StatusCode, serde_json::Value) {
    let response = response.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn root_and_health() {
    let tmp = tempfile::tempdir().unwrap();
    let state = state_with(SharedStore::new(empty_store(tmp.path())), Arc::new(AgreeableLlm));

    let (status, body) = body_json(handlers::root(State(state)).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "message": "Welcome to the Tourism Chatbot API" }));

    let (status, body) = body_json(handlers::health().await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn query_with_index_is_grounded() {
    let tmp = tempfile::tempdir().unwrap();
    let mut store = empty_store(tmp.path());
    store.build_index(delhi_chunks(), true).unwrap();
    let state = state_with(SharedStore::new(store), Arc::new(AgreeableLlm));

    let Json(resp) = handlers::query(State(state), Json(QueryRequest { query: "Where is the Red Fort?".into() })).await;
    assert_eq!(resp.response, "grounded answer");
}

#[tokio::test]
async fn query_without_index_still_answers() {
    let tmp = tempfile::tempdir().unwrap();
    let state = state_with(SharedStore::new(empty_store(tmp.path())), Arc::new(AgreeableLlm));

    let Json(resp) = handlers::query(State(state), Json(QueryRequest { query: "Best time for Goa?".into() })).await;
    assert_eq!(resp.response, "direct answer");
}

#[tokio::test]
async fn query_with_failing_llm_apologises() {
    let tmp = tempfile::tempdir().unwrap();
    let state = state_with(SharedStore::new(empty_store(tmp.path())), Arc::new(SilentLlm));

    let (status, body) = body_json(
        handlers::query(State(state), Json(QueryRequest { query: "anything".into() })).await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], APOLOGY);
}

#[tokio::test]
async fn reload_reports_missing_files_then_picks_up_new_index() {
    let tmp = tempfile::tempdir().unwrap();
    let shared = SharedStore::new(empty_store(tmp.path()));
    let state = state_with(shared.clone(), Arc::new(AgreeableLlm));

    let (status, body) = body_json(handlers::reload(State(state.clone())).await).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "error");

    let mut writer = empty_store(tmp.path());
    writer.build_index(delhi_chunks(), true).unwrap();
    writer.save(None, None).unwrap();

    let (status, body) = body_json(handlers::reload(State(state)).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "status": "ok", "chunks": 2 }));
    assert!(shared.is_initialized());
}
