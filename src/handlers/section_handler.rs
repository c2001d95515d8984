//! Section Endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use super::error::{failed, Action, ApiError, ApiResult};
use super::extract::{ApiJson, EntityId};
use crate::domain::{Item, NewSection, Section, SectionPatch};
use crate::notifier::ChangeEvent;
use crate::repository::{OrderingOperations, Repository, ScopedRepository};
use crate::AppState;

#[derive(Serialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
}

/// GET /sections/:id (with items)
pub async fn get_section(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Json<Section>> {
    let section = state
        .sections
        .find_with_items(id)
        .await
        .map_err(failed(Action::Fetch, "section"))?
        .ok_or_else(|| ApiError::not_found("Section", id))?;
    Ok(Json(section))
}

/// POST /sections
pub async fn create_section(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewSection>,
) -> ApiResult<(StatusCode, Json<Section>)> {
    let section = state
        .sections
        .create(input)
        .await
        .map_err(failed(Action::Create, "section"))?;
    state.notifier.broadcast(ChangeEvent::SectionCreated(section.clone()));
    Ok((StatusCode::CREATED, Json(section)))
}

/// PUT /sections/:id
pub async fn update_section(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ApiJson(patch): ApiJson<SectionPatch>,
) -> ApiResult<Json<Section>> {
    let section = state
        .sections
        .update(id, patch)
        .await
        .map_err(failed(Action::Update, "section"))?;
    state.notifier.broadcast(ChangeEvent::SectionUpdated(section.clone()));
    Ok(Json(section))
}

/// DELETE /sections/:id
pub async fn delete_section(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<StatusCode> {
    let section = state
        .sections
        .delete(id)
        .await
        .map_err(failed(Action::Delete, "section"))?;
    state.notifier.broadcast(ChangeEvent::SectionDeleted {
        id,
        list_id: section.list_id,
    });
    Ok(StatusCode::NO_CONTENT)
}

/// GET /sections/:id/items
pub async fn list_items(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Json<ItemsResponse>> {
    let items = state
        .items
        .list_in_scope(id)
        .await
        .map_err(failed(Action::Fetch, "items"))?;
    Ok(Json(ItemsResponse { items }))
}

/// POST /sections/:id/move-up
pub async fn move_section_up(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Json<Section>> {
    let reordered = state
        .sections
        .move_up(id)
        .await
        .map_err(failed(Action::Move, "section"))?;
    state.notifier.broadcast(ChangeEvent::SectionsReordered {
        list_id: reordered.entity.list_id,
        ids: reordered.affected_ids(id),
    });
    Ok(Json(reordered.entity))
}

/// POST /sections/:id/move-down
pub async fn move_section_down(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<Json<Section>> {
    let reordered = state
        .sections
        .move_down(id)
        .await
        .map_err(failed(Action::Move, "section"))?;
    state.notifier.broadcast(ChangeEvent::SectionsReordered {
        list_id: reordered.entity.list_id,
        ids: reordered.affected_ids(id),
    });
    Ok(Json(reordered.entity))
}
