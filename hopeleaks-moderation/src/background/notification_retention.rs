use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use hopeleaks_shared::errors::{AppError, AppResult};

use crate::store::{Gateway, NotificationStore};

/// Delete notifications created more than `retention_days` before `now`.
pub async fn purge_once<G: Gateway>(gateway: &G, retention_days: u32, now: DateTime<Utc>) -> AppResult<usize> {
    let cutoff = now
        .checked_sub_signed(chrono::Duration::days(i64::from(retention_days)))
        .ok_or_else(|| AppError::internal("notification retention reaches before the supported date range"))?;
    gateway.run(move |conn| conn.purge_notifications_before(cutoff)).await
}

pub async fn run<G: Gateway>(gateway: G, retention_days: u32, every: Duration, cancel: CancellationToken) {
    tracing::info!(
        retention_days,
        interval_secs = every.as_secs(),
        "notification retention job started"
    );
    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("notification retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match purge_once(&gateway, retention_days, Utc::now()).await {
                    Ok(0) => tracing::debug!("notification retention: nothing to purge"),
                    Ok(deleted) => tracing::info!(deleted, "notification retention: purged old rows"),
                    Err(e) => tracing::error!(error = %e, "notification retention: cleanup failed"),
                }
            }
        }
    }
}
