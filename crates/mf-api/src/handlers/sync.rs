//! Pipeline trigger and status handlers

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use mf_database_mysql::PipelineStatusRow;
use mf_loaders::{LoaderError, SyncMode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize, Default)]
pub struct TriggerQuery {
    pub mode: Option<String>,
}

/// `POST /sync/trigger?mode=full|incremental`
///
/// 202 when the run is accepted (it proceeds in the background), 409 when a
/// run already holds the pipeline slot, 400 on a bad mode.
pub async fn trigger(
    State(state): State<AppState>,
    Query(query): Query<TriggerQuery>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    let mode: SyncMode = query
        .mode
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("missing required query parameter: mode".to_string()))?
        .parse()
        .map_err(|_| {
            ApiError::BadRequest("invalid mode; expected 'full' or 'incremental'".to_string())
        })?;

    match state.runner.try_spawn(mode) {
        Ok(()) => Ok((
            StatusCode::ACCEPTED,
            Json(json!({ "status": "accepted", "mode": mode.to_string() })),
        )),
        Err(LoaderError::AlreadyRunning) => {
            Err(ApiError::Conflict("a sync is already running".to_string()))
        }
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}

#[derive(Debug, Serialize)]
pub struct BucketStatusResponse {
    pub name: &'static str,
    pub tokens: f64,
    pub last_refill_ms: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SyncStatusResponse {
    pub pipeline: PipelineStatusRow,
    /// `{sync_type: {status: count}}`
    pub sync_states: BTreeMap<String, BTreeMap<String, i64>>,
    /// Per-bucket limiter peek; absent when the store is unreachable
    pub rate_limiter: Option<Vec<BucketStatusResponse>>,
}

/// `GET /sync/status`
pub async fn status(State(state): State<AppState>) -> ApiResult<Json<SyncStatusResponse>> {
    let pipeline = state.pipeline.get().await?;

    let mut sync_states: BTreeMap<String, BTreeMap<String, i64>> = BTreeMap::new();
    for (sync_type, status, count) in state.sync_states.status_counts().await? {
        sync_states.entry(sync_type).or_default().insert(status, count);
    }

    let rate_limiter = state.limiter.status().await.ok().map(|buckets| {
        buckets
            .into_iter()
            .map(|bucket| BucketStatusResponse {
                name: bucket.name,
                tokens: bucket.tokens,
                last_refill_ms: bucket.last_refill_ms,
            })
            .collect()
    });

    Ok(Json(SyncStatusResponse { pipeline, sync_states, rate_limiter }))
}
