use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResponse {
    pub response: String,
}

pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "message": state.banner }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Always 200: failures inside the pipeline turn into fallback text.
pub async fn query(State(state): State<Arc<AppState>>, Json(req): Json<QueryRequest>) -> Json<QueryResponse> {
    tracing::info!(query = %req.query, "query received");
    let outcome = state.pipeline.answer(&req.query).await;
    tracing::debug!(resolution = ?outcome.resolution, "query resolved");
    Json(QueryResponse { response: outcome.response })
}

/// Swap in the index currently on disk.
pub async fn reload(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    let store = state.store.clone();
    match tokio::task::spawn_blocking(move || store.reload()).await {
        Ok(Ok(chunks)) => (StatusCode::OK, Json(json!({ "status": "ok", "chunks": chunks }))),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "reload failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "error", "message": e.to_string() })))
        }
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "error", "message": e.to_string() }))),
    }
}
