use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;

use hopeleaks_shared::middleware::decode_token;

use crate::notifications::ConnectionHub;
use crate::store::Gateway;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
enum ClientMessage {
    Auth { token: String },
    Ping,
}

pub async fn ws_handler<G: Gateway>(ws: WebSocketUpgrade, State(state): State<Arc<AppState<G>>>) -> impl IntoResponse {
    let hub = state.hub.clone();
    let jwt_secret = state.config.jwt_secret.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub, jwt_secret))
}

async fn handle_socket(socket: WebSocket, hub: Arc<ConnectionHub>, jwt_secret: String) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::debug!(conn_id = %conn_id, "websocket connected");

    let mut rx = hub.add(conn_id.clone()).await;
    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "websocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if let Some(reply) = handle_text(&hub, &conn_id, &text, &jwt_secret).await {
                    hub.send_to_conn(&conn_id, reply).await;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => tracing::trace!(conn_id = %conn_id, "pong received"),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "websocket receive error");
                break;
            }
        }
    }

    hub.remove(&conn_id).await;
    send_task.abort();
    tracing::debug!(conn_id = %conn_id, "websocket disconnected");
}

/// Handle one client frame; returns the reply to send back, if any.
async fn handle_text(hub: &ConnectionHub, conn_id: &str, text: &str, jwt_secret: &str) -> Option<Message> {
    let reply = match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Auth { token }) => match decode_token(&token, jwt_secret) {
            Ok(claims) => {
                hub.authenticate(conn_id, &claims.discord_id).await;
                tracing::debug!(conn_id, user_id = %claims.discord_id, "websocket authenticated");
                json!({ "type": "authenticated", "payload": { "userId": claims.discord_id } })
            }
            Err(e) => {
                tracing::debug!(conn_id, error = %e, "websocket auth rejected");
                json!({ "type": "error", "payload": { "message": "invalid token" } })
            }
        },
        Ok(ClientMessage::Ping) => json!({ "type": "pong" }),
        Err(_) => {
            tracing::trace!(conn_id, "ignoring unrecognised websocket frame");
            return None;
        }
    };

    Some(Message::Text(reply.to_string()))
}
