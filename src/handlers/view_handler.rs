//! Web view: full snapshot plus a live change stream.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;

use super::error::{failed, Action, ApiResult};
use crate::domain::{now_millis, List};
use crate::notifier::{ChangeEvent, Notifier, ViewerMessage};
use crate::AppState;

#[derive(Serialize)]
pub struct Snapshot {
    pub lists: Vec<List>,
    pub timestamp: i64,
}

/// GET /data
pub async fn snapshot(State(state): State<AppState>) -> ApiResult<Json<Snapshot>> {
    let lists = state
        .lists
        .snapshot()
        .await
        .map_err(failed(Action::Fetch, "lists"))?;
    Ok(Json(Snapshot {
        lists,
        timestamp: now_millis(),
    }))
}

/// GET /ws
pub async fn websocket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| serve_viewer(socket, state.notifier))
}

async fn serve_viewer(socket: WebSocket, notifier: Notifier) {
    let mut viewer = notifier.subscribe();
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            event = viewer.recv() => {
                // None: dropped from the registry for lagging
                let Some(payload) = event else { break };
                if sink.send(Message::Text(payload.to_string())).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if let Ok(ViewerMessage::Ping) = serde_json::from_str(&text) {
                        let pong = match ChangeEvent::Pong.to_json() {
                            Ok(json) => json,
                            Err(_) => continue,
                        };
                        if sink.send(Message::Text(pong)).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
    }

    let id = viewer.id();
    drop(viewer);
    tracing::debug!(viewer = id, viewers = notifier.viewer_count(), "Viewer socket closed");
    let _ = sink.close().await;
}
