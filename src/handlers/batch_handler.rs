use axum::{extract::State, http::StatusCode, Json};

use super::error::{failed, Action, ApiResult};
use super::extract::ApiJson;
use crate::domain::{BatchOutcome, BatchRequest};
use crate::notifier::ChangeEvent;
use crate::AppState;

/// POST /batch
///
/// One of three shapes: `{list}`, `{list_id, sections}` or
/// `{section_id, items}`. All rows land in one transaction.
pub async fn create_batch(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BatchRequest>,
) -> ApiResult<(StatusCode, Json<BatchOutcome>)> {
    let outcome = state
        .batch
        .create(request)
        .await
        .map_err(failed(Action::Create, "batch"))?;
    tracing::info!(
        list = ?outcome.list.as_ref().map(|l| l.id),
        sections = outcome.sections.len(),
        items = outcome.items.len(),
        "Batch created"
    );
    state.notifier.broadcast(ChangeEvent::batch_created(&outcome));
    Ok((StatusCode::CREATED, Json(outcome)))
}
