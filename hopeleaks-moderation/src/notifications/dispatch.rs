use tokio_util::task::TaskTracker;

use crate::models::{NewAuditLog, NewNotification};
use crate::notifications::NotificationSink;
use crate::store::{AuditStore, Gateway};

/// Fire-and-forget side channels of a moderation action.
///
/// Each notification or audit entry runs as its own task on a shared
/// [`TaskTracker`]; failures are logged and counted, never returned. The
/// tracker is drained on shutdown so queued writes are not lost.
#[derive(Clone)]
pub struct Dispatcher<G, N> {
    gateway: G,
    sink: N,
    tracker: TaskTracker,
}

impl<G: Gateway, N: NotificationSink> Dispatcher<G, N> {
    pub fn new(gateway: G, sink: N) -> Self {
        Self {
            gateway,
            sink,
            tracker: TaskTracker::new(),
        }
    }

    pub fn notify(&self, notification: NewNotification) {
        let sink = self.sink.clone();
        self.tracker.spawn(async move {
            let user_id = notification.user_id.clone();
            let notification_type = notification.notification_type.clone();

            if let Err(e) = sink.create_and_push(notification).await {
                metrics::counter!("notifications_dispatch_failed_total", "kind" => "notification").increment(1);
                tracing::warn!(
                    error = %e,
                    user_id = %user_id,
                    notification_type = %notification_type,
                    "failed to deliver notification"
                );
            }
        });
    }

    pub fn audit(&self, entry: NewAuditLog) {
        let gateway = self.gateway.clone();
        self.tracker.spawn(async move {
            let admin_id = entry.admin_id.clone();
            let action = entry.action.clone();

            if let Err(e) = gateway.run(move |conn| conn.log_action(entry)).await {
                metrics::counter!("notifications_dispatch_failed_total", "kind" => "audit").increment(1);
                tracing::warn!(error = %e, admin_id = %admin_id, action = %action, "failed to write audit log");
            }
        });
    }

    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Stop accepting work and wait for everything in flight.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }

    /// Wait for in-flight tasks, then keep accepting new ones.
    #[cfg(test)]
    pub async fn settle(&self) {
        self.drain().await;
        self.tracker.reopen();
    }
}
