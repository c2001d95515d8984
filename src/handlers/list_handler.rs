//! List Endpoints
//!
//! CRUD, reordering and the per-list section listing.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use super::error::{failed, Action, ApiError, ApiResult};
use super::extract::{ApiJson, EntityId};
use crate::domain::{List, ListPatch, NewList, Section};
use crate::notifier::ChangeEvent;
use crate::repository::{OrderingOperations, Repository, ScopedRepository};
use crate::AppState;

#[derive(Serialize)]
pub struct ListsResponse {
    pub lists: Vec<List>,
}

#[derive(Serialize)]
pub struct SectionsResponse {
    pub sections: Vec<Section>,
}

/// GET /lists
pub async fn list_lists(State(state): State<AppState>) -> ApiResult<Json<ListsResponse>> {
    let lists = state
        .lists
        .list_in_scope(())
        .await
        .map_err(failed(Action::Fetch, "lists"))?;
    Ok(Json(ListsResponse { lists }))
}

/// GET /lists/:id
pub async fn get_list(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Json<List>> {
    let list = state
        .lists
        .find_by_id(id)
        .await
        .map_err(failed(Action::Fetch, "list"))?
        .ok_or_else(|| ApiError::not_found("List", id))?;
    Ok(Json(list))
}

/// POST /lists
pub async fn create_list(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewList>,
) -> ApiResult<(StatusCode, Json<List>)> {
    let list = state
        .lists
        .create(input)
        .await
        .map_err(failed(Action::Create, "list"))?;
    state.notifier.broadcast(ChangeEvent::ListCreated(list.clone()));
    Ok((StatusCode::CREATED, Json(list)))
}

/// PUT /lists/:id
pub async fn update_list(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ApiJson(patch): ApiJson<ListPatch>,
) -> ApiResult<Json<List>> {
    let list = state
        .lists
        .update(id, patch)
        .await
        .map_err(failed(Action::Update, "list"))?;
    state.notifier.broadcast(ChangeEvent::ListUpdated(list.clone()));
    Ok(Json(list))
}

/// DELETE /lists/:id
pub async fn delete_list(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<StatusCode> {
    state
        .lists
        .delete(id)
        .await
        .map_err(failed(Action::Delete, "list"))?;
    state.notifier.broadcast(ChangeEvent::ListDeleted { id });
    Ok(StatusCode::NO_CONTENT)
}

/// GET /lists/:id/sections
pub async fn list_sections(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<Json<SectionsResponse>> {
    let sections = state
        .sections
        .list_in_scope(id)
        .await
        .map_err(failed(Action::Fetch, "sections"))?;
    Ok(Json(SectionsResponse { sections }))
}

/// POST /lists/:id/move-up
pub async fn move_list_up(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Json<List>> {
    let reordered = state
        .lists
        .move_up(id)
        .await
        .map_err(failed(Action::Move, "list"))?;
    state.notifier.broadcast(ChangeEvent::ListsReordered {
        ids: reordered.affected_ids(id),
    });
    Ok(Json(reordered.entity))
}

/// POST /lists/:id/move-down
pub async fn move_list_down(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Json<List>> {
    let reordered = state
        .lists
        .move_down(id)
        .await
        .map_err(failed(Action::Move, "list"))?;
    state.notifier.broadcast(ChangeEvent::ListsReordered {
        ids: reordered.affected_ids(id),
    });
    Ok(Json(reordered.entity))
}
