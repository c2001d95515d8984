//! Item Endpoints
//!
//! CRUD, flag toggles, reordering and moving between sections.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use super::error::{failed, Action, ApiError, ApiResult};
use super::extract::{ApiJson, EntityId};
use crate::domain::{Item, ItemFlag, ItemPatch, NewItem};
use crate::notifier::ChangeEvent;
use crate::repository::{OrderingOperations, Reordered, Repository};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MoveItemRequest {
    #[serde(default)]
    pub section_id: i64,
}

/// GET /items/:id
pub async fn get_item(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Json<Item>> {
    let item = state
        .items
        .find_by_id(id)
        .await
        .map_err(failed(Action::Fetch, "item"))?
        .ok_or_else(|| ApiError::not_found("Item", id))?;
    Ok(Json(item))
}

/// POST /items
pub async fn create_item(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewItem>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    let item = state
        .items
        .create(input)
        .await
        .map_err(failed(Action::Create, "item"))?;
    state.notifier.broadcast(ChangeEvent::ItemCreated(item.clone()));
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /items/:id
pub async fn update_item(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ApiJson(patch): ApiJson<ItemPatch>,
) -> ApiResult<Json<Item>> {
    let item = state
        .items
        .update(id, patch)
        .await
        .map_err(failed(Action::Update, "item"))?;
    state.notifier.broadcast(ChangeEvent::ItemUpdated(item.clone()));
    Ok(Json(item))
}

/// DELETE /items/:id
pub async fn delete_item(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<StatusCode> {
    let item = state
        .items
        .delete(id)
        .await
        .map_err(failed(Action::Delete, "item"))?;
    state.notifier.broadcast(ChangeEvent::ItemDeleted {
        id,
        section_id: item.section_id,
    });
    Ok(StatusCode::NO_CONTENT)
}

/// POST /items/:id/toggle
pub async fn toggle_completed(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Json<Item>> {
    toggle(&state, id, ItemFlag::Completed).await
}

/// POST /items/:id/uncertain
pub async fn toggle_uncertain(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Json<Item>> {
    toggle(&state, id, ItemFlag::Uncertain).await
}

async fn toggle(state: &AppState, id: i64, flag: ItemFlag) -> ApiResult<Json<Item>> {
    let item = state
        .items
        .toggle(id, flag)
        .await
        .map_err(failed(Action::Update, "item"))?;
    state.notifier.broadcast(ChangeEvent::ItemToggled(item.clone()));
    Ok(Json(item))
}

/// POST /items/:id/move
pub async fn move_item(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ApiJson(request): ApiJson<MoveItemRequest>,
) -> ApiResult<Json<Item>> {
    let relocation = state
        .items
        .move_to_section(id, request.section_id)
        .await
        .map_err(failed(Action::Move, "item"))?;
    if relocation.moved() {
        tracing::info!(
            item = id,
            from = relocation.from_section_id,
            to = relocation.item.section_id,
            "Item moved to another section"
        );
    }
    state.notifier.broadcast(ChangeEvent::ItemMoved {
        item: relocation.item.clone(),
        from_section_id: relocation.from_section_id,
    });
    Ok(Json(relocation.item))
}

/// POST /items/:id/move-up
pub async fn move_item_up(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Json<Item>> {
    let reordered = state
        .items
        .move_up(id)
        .await
        .map_err(failed(Action::Move, "item"))?;
    Ok(Json(announce_reorder(&state, id, reordered)))
}

/// POST /items/:id/move-down
pub async fn move_item_down(State(state): State<AppState>, EntityId(id): EntityId) -> ApiResult<Json<Item>> {
    let reordered = state
        .items
        .move_down(id)
        .await
        .map_err(failed(Action::Move, "item"))?;
    Ok(Json(announce_reorder(&state, id, reordered)))
}

fn announce_reorder(state: &AppState, id: i64, reordered: Reordered<Item>) -> Item {
    state.notifier.broadcast(ChangeEvent::ItemsReordered {
        section_id: reordered.entity.section_id,
        ids: reordered.affected_ids(id),
    });
    reordered.entity
}
