//! Item history (name suggestions) endpoints.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::{failed, Action, ApiError, ApiResult};
use super::extract::{ApiJson, EntityId};
use crate::domain::{HistoryEntry, HistoryQuery, NewHistoryEntry};
use crate::notifier::ChangeEvent;
use crate::AppState;

#[derive(Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BatchDeleteRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleteResponse {
    pub deleted: usize,
}

/// GET /history?section_id=&q=&sort=recent|frequent&limit=
pub async fn list_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Json<HistoryResponse>> {
    let Query(query) = query.map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    let history = state
        .history
        .query(query)
        .await
        .map_err(failed(Action::Fetch, "history"))?;
    Ok(Json(HistoryResponse { history }))
}

/// POST /history
pub async fn create_history(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewHistoryEntry>,
) -> ApiResult<(StatusCode, Json<HistoryEntry>)> {
    let entry = state
        .history
        .record(input)
        .await
        .map_err(failed(Action::Create, "history entry"))?;
    state.notifier.broadcast(ChangeEvent::HistoryChanged {
        section_id: Some(entry.section_id),
    });
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /history/:id
pub async fn delete_history(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<StatusCode> {
    let entry = state
        .history
        .delete(id)
        .await
        .map_err(failed(Action::Delete, "history entry"))?;
    state.notifier.broadcast(ChangeEvent::HistoryChanged {
        section_id: Some(entry.section_id),
    });
    Ok(StatusCode::NO_CONTENT)
}

/// POST /history/batch-delete
pub async fn batch_delete_history(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BatchDeleteRequest>,
) -> ApiResult<Json<BatchDeleteResponse>> {
    let deleted = state
        .history
        .delete_many(request.ids)
        .await
        .map_err(failed(Action::Delete, "history entries"))?;
    state.notifier.broadcast(ChangeEvent::HistoryChanged { section_id: None });
    Ok(Json(BatchDeleteResponse { deleted }))
}
