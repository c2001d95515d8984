//! Handlers Layer
//!
//! HTTP handlers that bridge clients to the repositories, plus the router.

mod batch_handler;
mod error;
mod extract;
mod history_handler;
mod item_handler;
mod list_handler;
mod section_handler;
mod view_handler;

pub use error::{ApiError, ApiResult};

use axum::{
    extract::{Request, State},
    http::{
        header::{ALLOW, AUTHORIZATION},
        StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

/// REST routes, relative to `/api/v1`
fn api_routes() -> Router<AppState> {
    use batch_handler::*;
    use history_handler::*;
    use item_handler::*;
    use list_handler::*;
    use section_handler::*;

    Router::new()
        .route("/lists", get(list_lists).post(create_list))
        .route("/lists/:id", get(get_list).put(update_list).delete(delete_list))
        .route("/lists/:id/sections", get(list_sections))
        .route("/lists/:id/move-up", post(move_list_up))
        .route("/lists/:id/move-down", post(move_list_down))
        .route("/sections", post(create_section))
        .route(
            "/sections/:id",
            get(get_section).put(update_section).delete(delete_section),
        )
        .route("/sections/:id/items", get(list_items))
        .route("/sections/:id/move-up", post(move_section_up))
        .route("/sections/:id/move-down", post(move_section_down))
        .route("/items", post(create_item))
        .route("/items/:id", get(get_item).put(update_item).delete(delete_item))
        .route("/items/:id/toggle", post(toggle_completed))
        .route("/items/:id/uncertain", post(toggle_uncertain))
        .route("/items/:id/move", post(move_item))
        .route("/items/:id/move-up", post(move_item_up))
        .route("/items/:id/move-down", post(move_item_down))
        .route("/batch", post(create_batch))
        .route("/history", get(list_history).post(create_history))
        .route("/history/:id", axum::routing::delete(delete_history))
        .route("/history/batch-delete", post(batch_delete_history))
        .fallback(|| async { ApiError::route_not_found() })
}

/// Full application router
pub fn router(state: AppState) -> Router {
    let api = api_routes()
        .layer(middleware::map_response(json_method_not_allowed))
        .layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .nest("/api/v1", api)
        .route("/data", get(view_handler::snapshot))
        .route("/ws", get(view_handler::websocket))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Gate for `/api/v1`: 503 when no token is configured, 401 on mismatch
async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(expected) = state.api_token.as_deref() else {
        return ApiError::api_disabled().into_response();
    };

    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if provided != Some(expected) {
        tracing::warn!(path = %request.uri().path(), "Rejected API request with bad token");
        return ApiError::unauthorized().into_response();
    }

    next.run(request).await
}

/// Give the router's bare 405 the same JSON body as every other API error
async fn json_method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let allow = response.headers().get(ALLOW).cloned();
    let mut mapped = ApiError::method_not_allowed().into_response();
    if let Some(allow) = allow {
        mapped.headers_mut().insert(ALLOW, allow);
    }
    mapped
}
