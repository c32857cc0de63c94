use std::collections::HashMap;

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, RwLock};

pub type WsSender = mpsc::UnboundedSender<Message>;

struct Connection {
    /// Set once the client has sent a valid token.
    user_id: Option<String>,
    sender: WsSender,
    connected_at: DateTime<Utc>,
}

/// Live WebSocket connections, keyed by connection id.
pub struct ConnectionHub {
    connections: RwLock<HashMap<String, Connection>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register an anonymous connection and return its outbound queue.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Connection {
            user_id: None,
            sender: tx,
            connected_at: Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Bind a connection to a user. Returns false for unknown connections.
    pub async fn authenticate(&self, conn_id: &str, user_id: &str) -> bool {
        match self.connections.write().await.get_mut(conn_id) {
            Some(conn) => {
                conn.user_id = Some(user_id.to_string());
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, conn_id: &str) {
        if let Some(conn) = self.connections.write().await.remove(conn_id) {
            let open_secs = (Utc::now() - conn.connected_at).num_seconds();
            tracing::debug!(conn_id, open_secs, "connection removed from hub");
        }
    }

    pub async fn send_to_conn(&self, conn_id: &str, message: Message) -> bool {
        self.connections
            .read()
            .await
            .get(conn_id)
            .map_or(false, |conn| conn.sender.send(message).is_ok())
    }

    /// Push to every connection of `user_id`; returns how many were reached.
    pub async fn send_to_user(&self, user_id: &str, message: Message) -> usize {
        let conns = self.connections.read().await;
        conns
            .values()
            .filter(|conn| conn.user_id.as_deref() == Some(user_id))
            .filter(|conn| conn.sender.send(message.clone()).is_ok())
            .count()
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Vec::new()));
        }
    }

    /// Close every connection; used on shutdown.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "closed all websocket connections");
    }
}

impl Default for ConnectionHub {
    fn default() -> Self {
        Self::new()
    }
}
