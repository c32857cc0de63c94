//! Persistence seam for the moderation service.
//!
//! Store traits are implemented by a connection type and stay synchronous, the
//! way diesel is. A [`Gateway`] hands out such connections on a blocking
//! thread, either one statement at a time (`run`) or inside a transaction
//! that commits on `Ok` and rolls back otherwise (`transaction`).

use std::future::Future;

use chrono::{DateTime, Utc};

use hopeleaks_shared::errors::AppResult;

use crate::models::{
    AuditFilter, AuditLogEntry, CommentRef, ModerationStats, NewAuditLog, NewNotification, NewReport,
    NewStrike, Notification, PendingReport, PendingScript, Report, ReportListing, ReportStatus, ScriptRef,
    Strike, StrikeSummary,
};

#[cfg(test)]
pub mod memory;
pub mod pg;

pub use pg::PgGateway;

pub trait ReportStore {
    fn create_report(&mut self, report: NewReport) -> AppResult<Report>;

    /// Newest first; `None` lists every status.
    fn list_reports(&mut self, status: Option<ReportStatus>, limit: i64, offset: i64) -> AppResult<Vec<ReportListing>>;

    fn count_reports(&mut self, status: Option<ReportStatus>) -> AppResult<i64>;

    fn find_report(&mut self, id: i64) -> AppResult<Option<Report>>;

    /// Unconditional write of status and reviewer; returns whether a row changed.
    fn update_report_status(
        &mut self,
        id: i64,
        status: ReportStatus,
        reviewer_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Same as [`update_report_status`](Self::update_report_status) but only
    /// while the row still has status `expected`.
    fn update_report_status_if(
        &mut self,
        id: i64,
        expected: ReportStatus,
        status: ReportStatus,
        reviewer_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    fn pending_reports(&mut self) -> AppResult<Vec<PendingReport>>;
}

pub trait StrikeStore {
    fn give_strike(&mut self, strike: NewStrike) -> AppResult<Strike>;

    fn find_strike(&mut self, id: i64) -> AppResult<Option<Strike>>;

    /// Strikes still active and not yet past their expiry.
    fn active_strikes(&mut self, user_id: &str, now: DateTime<Utc>) -> AppResult<Vec<Strike>> {
        self.strike_history(user_id, true, now)
    }

    /// Every strike of a user, newest first, optionally only those in force.
    fn strike_history(&mut self, user_id: &str, active_only: bool, now: DateTime<Utc>) -> AppResult<Vec<Strike>>;

    /// Users with strikes in force, most strikes first then most recent.
    fn strike_overview(&mut self, now: DateTime<Utc>) -> AppResult<Vec<StrikeSummary>>;

    fn remove_strike(&mut self, id: i64, removed_by: &str, now: DateTime<Utc>) -> AppResult<bool>;

    /// Deactivates strikes past their expiry; returns how many changed.
    fn sweep_expired_strikes(&mut self, now: DateTime<Utc>) -> AppResult<usize>;
}

pub trait ContentStore {
    fn find_script(&mut self, id: i64) -> AppResult<Option<ScriptRef>>;

    fn soft_delete_script(&mut self, id: i64, deleted_by: &str, now: DateTime<Utc>) -> AppResult<bool>;

    fn find_comment(&mut self, id: i64) -> AppResult<Option<CommentRef>>;

    /// Admin override: no author check.
    fn soft_delete_comment(&mut self, id: i64, deleted_by: &str, now: DateTime<Utc>) -> AppResult<bool>;

    fn pending_scripts(&mut self) -> AppResult<Vec<PendingScript>>;
}

pub trait AuditStore {
    fn log_action(&mut self, entry: NewAuditLog) -> AppResult<()>;

    fn audit_logs(&mut self, filter: &AuditFilter, limit: i64, offset: i64) -> AppResult<(Vec<AuditLogEntry>, i64)>;

    fn moderation_stats(&mut self, now: DateTime<Utc>) -> AppResult<ModerationStats>;
}

pub trait NotificationStore {
    fn insert_notification(&mut self, notification: NewNotification) -> AppResult<Notification>;

    fn list_notifications(
        &mut self,
        user_id: &str,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Notification>, i64)>;

    fn count_unread(&mut self, user_id: &str) -> AppResult<i64>;

    fn mark_read(&mut self, id: i64, user_id: &str) -> AppResult<bool>;

    fn mark_all_read(&mut self, user_id: &str) -> AppResult<usize>;

    fn delete_notification(&mut self, id: i64, user_id: &str) -> AppResult<bool>;

    fn purge_notifications_before(&mut self, cutoff: DateTime<Utc>) -> AppResult<usize>;
}

/// Everything a moderation request may touch through one connection.
pub trait ModerationConn: ReportStore + StrikeStore + ContentStore + AuditStore + NotificationStore {}

impl<T> ModerationConn for T where T: ReportStore + StrikeStore + ContentStore + AuditStore + NotificationStore {}

pub trait Gateway: Clone + Send + Sync + 'static {
    type Conn: ModerationConn;

    /// Runs `op` against one connection, outside any transaction.
    fn run<T, F>(&self, op: F) -> impl Future<Output = AppResult<T>> + Send
    where
        T: Send + 'static,
        F: FnOnce(&mut Self::Conn) -> AppResult<T> + Send + 'static;

    /// Runs `op` inside a transaction: committed on `Ok`, rolled back on `Err`.
    fn transaction<T, F>(&self, op: F) -> impl Future<Output = AppResult<T>> + Send
    where
        T: Send + 'static,
        F: FnOnce(&mut Self::Conn) -> AppResult<T> + Send + 'static;

    /// Round-trip used by the health check.
    fn ping(&self) -> impl Future<Output = AppResult<()>> + Send {
        self.run(|_| Ok(()))
    }
}
