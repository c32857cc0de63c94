use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use hopeleaks_shared::errors::AppResult;

use crate::store::{Gateway, StrikeStore};

/// Deactivate strikes whose expiry has passed as of `now`.
pub async fn sweep_once<G: Gateway>(gateway: &G, now: DateTime<Utc>) -> AppResult<usize> {
    let swept = gateway.run(move |conn| conn.sweep_expired_strikes(now)).await?;
    metrics::counter!("moderation_strikes_swept_total").increment(swept as u64);
    Ok(swept)
}

pub async fn run<G: Gateway>(gateway: G, every: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = every.as_secs(), "strike sweep job started");
    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("strike sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep_once(&gateway, Utc::now()).await {
                    Ok(0) => tracing::debug!("strike sweep: nothing expired"),
                    Ok(swept) => tracing::info!(swept, "strike sweep: deactivated expired strikes"),
                    Err(e) => tracing::error!(error = %e, "strike sweep failed"),
                }
            }
        }
    }
}
