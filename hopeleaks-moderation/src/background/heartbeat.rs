use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::notifications::ConnectionHub;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Ping every open socket so idle proxies keep the connection.
pub async fn run(hub: Arc<ConnectionHub>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(HEARTBEAT_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                let count = hub.connection_count().await;
                tracing::trace!(count, "websocket heartbeat");
                hub.ping_all().await;
            }
        }
    }
}
