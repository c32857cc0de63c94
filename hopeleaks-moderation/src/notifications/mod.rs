//! User notifications: persisted rows plus a live push over WebSocket.

use std::future::Future;
use std::sync::Arc;

use axum::extract::ws::Message;

use hopeleaks_shared::errors::AppResult;

use crate::models::NewNotification;
use crate::store::{Gateway, NotificationStore};

pub mod dispatch;
pub mod hub;
#[cfg(test)]
pub mod recording;
pub mod socket;

pub use dispatch::Dispatcher;
pub use hub::ConnectionHub;

/// Where notifications go. Returns the stored notification id.
pub trait NotificationSink: Clone + Send + Sync + 'static {
    fn create_and_push(&self, notification: NewNotification) -> impl Future<Output = AppResult<i64>> + Send;
}

/// Persists through the gateway, then pushes to the recipient's open sockets.
#[derive(Clone)]
pub struct LiveNotifier<G> {
    gateway: G,
    hub: Arc<ConnectionHub>,
}

impl<G: Gateway> LiveNotifier<G> {
    pub fn new(gateway: G, hub: Arc<ConnectionHub>) -> Self {
        Self { gateway, hub }
    }
}

impl<G: Gateway> NotificationSink for LiveNotifier<G> {
    async fn create_and_push(&self, notification: NewNotification) -> AppResult<i64> {
        let stored = self
            .gateway
            .run(move |conn| conn.insert_notification(notification))
            .await?;

        let frame = serde_json::json!({ "type": "notification", "payload": stored });
        let delivered = self
            .hub
            .send_to_user(&stored.user_id, Message::Text(frame.to_string()))
            .await;

        tracing::debug!(
            notification_id = stored.id,
            user_id = %stored.user_id,
            delivered,
            "notification pushed"
        );

        Ok(stored.id)
    }
}
