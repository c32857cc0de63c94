use chrono::Utc;
use serde_json::json;

use hopeleaks_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{NewAuditLog, NewStrike, ReportStatus, Strike};
use crate::moderation::{notices, AdminActor};
use crate::notifications::{Dispatcher, NotificationSink};
use crate::store::{ContentStore, Gateway, ReportStore, StrikeStore};

/// Lifetime of a strike given directly by an admin when none is requested.
pub const DEFAULT_DIRECT_STRIKE_DAYS: u32 = 30;

/// Requested lifetime to stored lifetime: absent means the default, 0 means permanent.
pub fn direct_strike_expiry(requested: Option<u32>) -> Option<u32> {
    match requested {
        None => Some(DEFAULT_DIRECT_STRIKE_DAYS),
        Some(0) => None,
        Some(days) => Some(days),
    }
}

/// Admin operations outside report resolution. Each one is audited.
#[derive(Clone)]
pub struct AdminActions<G, N> {
    gateway: G,
    dispatcher: Dispatcher<G, N>,
}

impl<G: Gateway, N: NotificationSink> AdminActions<G, N> {
    pub fn new(gateway: G, dispatcher: Dispatcher<G, N>) -> Self {
        Self { gateway, dispatcher }
    }

    /// Manual status correction. Writes status and reviewer only; no content
    /// action and no notices.
    pub async fn review_report(&self, report_id: i64, status: ReportStatus, actor: &AdminActor) -> AppResult<()> {
        if !status.is_terminal() {
            return Err(AppError::new(
                ErrorCode::InvalidReportStatus,
                "status must be one of reviewed, resolved, dismissed",
            ));
        }

        let admin_id = actor.id.clone();
        let now = Utc::now();
        let changed = self
            .gateway
            .run(move |conn| conn.update_report_status(report_id, status, &admin_id, now))
            .await?;

        if !changed {
            return Err(AppError::new(ErrorCode::ReportNotFound, "report not found"));
        }

        self.dispatcher.audit(
            NewAuditLog::new(&actor.id, "report_review")
                .target("report", report_id)
                .details(json!({ "status": status }))
                .ip(actor.ip.clone()),
        );
        tracing::info!(report_id, admin_id = %actor.id, status = %status, "report status set manually");

        Ok(())
    }

    pub async fn give_strike(
        &self,
        user_id: &str,
        reason: &str,
        expires_in_days: Option<u32>,
        actor: &AdminActor,
    ) -> AppResult<Strike> {
        let new_strike = NewStrike::new(user_id, reason, &actor.id, expires_in_days, Utc::now())?;
        let strike = self.gateway.run(move |conn| conn.give_strike(new_strike)).await?;

        self.dispatcher.notify(notices::strike_given(&strike, expires_in_days));
        self.dispatcher.audit(
            NewAuditLog::new(&actor.id, "give_strike")
                .target("user", user_id)
                .details(json!({ "reason": reason, "expires_in_days": expires_in_days, "strike_id": strike.id }))
                .ip(actor.ip.clone()),
        );

        metrics::counter!("moderation_strikes_issued_total", "source" => "admin").increment(1);
        tracing::info!(strike_id = strike.id, user_id, admin_id = %actor.id, "strike given by admin");

        Ok(strike)
    }

    pub async fn remove_strike(&self, strike_id: i64, actor: &AdminActor) -> AppResult<Strike> {
        let admin_id = actor.id.clone();
        let now = Utc::now();
        let strike = self
            .gateway
            .run(move |conn| {
                let strike = conn
                    .find_strike(strike_id)?
                    .ok_or_else(|| AppError::new(ErrorCode::StrikeNotFound, "strike not found"))?;
                conn.remove_strike(strike_id, &admin_id, now)?;
                Ok(strike)
            })
            .await?;

        self.dispatcher.notify(notices::strike_removed(&strike));
        self.dispatcher.audit(
            NewAuditLog::new(&actor.id, "remove_strike")
                .target("strike", strike_id)
                .details(json!({ "user_id": strike.user_id, "original_reason": strike.reason }))
                .ip(actor.ip.clone()),
        );
        tracing::info!(strike_id, user_id = %strike.user_id, admin_id = %actor.id, "strike removed");

        Ok(strike)
    }

    /// Manual run of the expiry sweep.
    pub async fn cleanup_strikes(&self, actor: &AdminActor) -> AppResult<usize> {
        let now = Utc::now();
        let cleaned = self.gateway.run(move |conn| conn.sweep_expired_strikes(now)).await?;

        self.dispatcher.audit(
            NewAuditLog::new(&actor.id, "cleanup_strikes")
                .details(json!({ "cleaned_count": cleaned }))
                .ip(actor.ip.clone()),
        );

        metrics::counter!("moderation_strikes_swept_total").increment(cleaned as u64);
        tracing::info!(cleaned, admin_id = %actor.id, "expired strikes cleaned up");

        Ok(cleaned)
    }

    pub async fn delete_script(&self, script_id: i64, actor: &AdminActor) -> AppResult<()> {
        let admin_id = actor.id.clone();
        let now = Utc::now();
        let title = self
            .gateway
            .run(move |conn| {
                let script = conn
                    .find_script(script_id)?
                    .filter(|s| !s.is_deleted)
                    .ok_or_else(|| AppError::new(ErrorCode::ScriptNotFound, "script not found"))?;
                conn.soft_delete_script(script_id, &admin_id, now)?;
                Ok(script.title)
            })
            .await?;

        self.dispatcher.audit(
            NewAuditLog::new(&actor.id, "delete_script")
                .target("script", script_id)
                .details(json!({ "title": title }))
                .ip(actor.ip.clone()),
        );
        tracing::info!(script_id, admin_id = %actor.id, "script deleted by admin");

        Ok(())
    }

    pub async fn delete_comment(&self, comment_id: i64, actor: &AdminActor) -> AppResult<()> {
        let admin_id = actor.id.clone();
        let now = Utc::now();
        let author = self
            .gateway
            .run(move |conn| {
                let comment = conn
                    .find_comment(comment_id)?
                    .filter(|c| !c.is_deleted)
                    .ok_or_else(|| AppError::new(ErrorCode::CommentNotFound, "comment not found"))?;
                conn.soft_delete_comment(comment_id, &admin_id, now)?;
                Ok(comment.user_id)
            })
            .await?;

        self.dispatcher.audit(
            NewAuditLog::new(&actor.id, "delete_comment")
                .target("comment", comment_id)
                .details(json!({ "author_id": author }))
                .ip(actor.ip.clone()),
        );
        tracing::info!(comment_id, admin_id = %actor.id, "comment deleted by admin");

        Ok(())
    }
}
