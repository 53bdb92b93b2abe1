use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use filmcraft_core::collaboration::Permission;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::access::authorize_project;
use crate::middleware::auth::{authenticate_token, AuthUser};
use crate::state::AppState;
use crate::ws::messages::{ClientMessage, ServerMessage};

/// Query string for `GET /ws`. Browsers cannot set headers on a WebSocket
/// handshake, so the access token travels here.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: String,
}

/// HTTP handler that authenticates and upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with `WsManager` and
/// managed by a sender task plus the receive loop.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> AppResult<Response> {
    let user = authenticate_token(&params.token, &state)?;
    Ok(ws
        .on_upgrade(move |socket| handle_socket(socket, state, user))
        .into_response())
}

/// Manage a single WebSocket connection after upgrade.
async fn handle_socket(socket: WebSocket, state: AppState, user: AuthUser) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = user.user_id, "WebSocket connected");

    let ws_manager = state.ws_manager.clone();
    let mut rx = ws_manager.add(conn_id.clone(), Some(user.user_id)).await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                let reply = handle_client_message(&state, &conn_id, &user, text.as_str()).await;
                ws_manager
                    .send_to(&conn_id, Message::Text(reply.to_json().into()))
                    .await;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Apply one client frame and build the reply.
async fn handle_client_message(
    state: &AppState,
    conn_id: &str,
    user: &AuthUser,
    text: &str,
) -> ServerMessage {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            return ServerMessage::Error {
                message: format!("Unrecognized message: {e}"),
            }
        }
    };

    match message {
        ClientMessage::Subscribe { project_id } => {
            match authorize_project(&state.pool, user, project_id, Permission::View).await {
                Ok(_) => {
                    state.ws_manager.subscribe(conn_id, project_id).await;
                    tracing::debug!(conn_id, project_id, "Subscribed to project");
                    ServerMessage::Subscribed { project_id }
                }
                Err(e) => ServerMessage::Error {
                    message: e.to_string(),
                },
            }
        }
        ClientMessage::Unsubscribe { project_id } => {
            state.ws_manager.unsubscribe(conn_id, project_id).await;
            ServerMessage::Unsubscribed { project_id }
        }
    }
}
