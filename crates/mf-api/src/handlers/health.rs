//! Liveness handler

use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

/// `GET /health`
///
/// Always 200 while the process serves requests; the body reports whether
/// the limiter's key-value store is currently reachable.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let kv_store = match state.limiter.status().await {
        Ok(_) => "reachable",
        Err(_) => "unreachable",
    };

    Json(json!({ "status": "ok", "kv_store": kv_store }))
}
