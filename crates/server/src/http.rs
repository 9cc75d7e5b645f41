//! JSON request/response bodies for spec.md §6's HTTP surface, and the
//! handlers that decode them and call into [`router::Router`].

use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use router::NewKeyEntry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of `POST /api/put`.
#[derive(Debug, Deserialize)]
pub struct PutRequest {
    #[serde(rename = "newKeys")]
    pub new_keys: Vec<PutEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PutEntry {
    pub key: String,
    pub value: Vec<String>,
}

/// Body of `GET /api/get`.
#[derive(Debug, Deserialize)]
pub struct GetRequest {
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GetResponse {
    pub value: Vec<Vec<String>>,
}

/// `POST /api/put`: fans the batch out to cache and persistence, acking
/// only after both tiers have accepted every entry.
pub async fn put(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PutRequest>,
) -> Result<(StatusCode, String), ApiError> {
    let entries = body
        .new_keys
        .into_iter()
        .map(|entry| NewKeyEntry {
            key: entry.key,
            value: entry.value,
        })
        .collect();

    state
        .router
        .put(entries)
        .await
        .map_err(|e| ApiError(e.to_string()))?;

    Ok((StatusCode::OK, "Keys added successfully...".to_string()))
}

/// `GET /api/get`: resolves each key (cache first, persistence on miss) and
/// returns the results in input order.
pub async fn get(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GetRequest>,
) -> Json<GetResponse> {
    let value = state.router.get(body.keys).await;
    Json(GetResponse { value })
}

/// `GET /health`: trivial liveness probe, not part of spec.md's core
/// contract but expected of any process the corpus ships.
pub async fn health() -> &'static str {
    "ok"
}

/// Any downstream failure (persistence actor gone, I/O error) surfaces as
/// a 500 with a one-line reason, per spec.md §7's router propagation policy.
pub struct ApiError(String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.0).into_response()
    }
}
