use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text, Timestamptz};

use hopeleaks_shared::clients::db::{DbConn, DbPool};
use hopeleaks_shared::errors::{AppError, AppResult};

use crate::models::{
    AuditFilter, AuditLog, AuditLogEntry, CommentRef, ModerationStats, NewAuditLog, NewNotification, NewReport,
    NewStrike, Notification, PendingReport, PendingScript, Report, ReportListing, ReportStatus, ScriptRef,
    Strike, StrikeSummary,
};
use crate::schema::{audit_logs, comments, notifications, reports, scripts, user_strikes, users};
use crate::store::{AuditStore, ContentStore, Gateway, NotificationStore, ReportStore, StrikeStore};

/// Diesel/r2d2 backed gateway. Every call runs on the blocking pool.
#[derive(Clone)]
pub struct PgGateway {
    pool: DbPool,
}

impl PgGateway {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Pool checkout with a single retry; a second failure is reported as 503.
    fn checkout(pool: &DbPool) -> AppResult<DbConn> {
        match pool.get() {
            Ok(conn) => Ok(conn),
            Err(first) => {
                tracing::warn!(error = %first, "db connection checkout failed, retrying");
                pool.get().map_err(|e| {
                    tracing::error!(error = %e, "failed to get db connection");
                    AppError::unavailable("database connection error")
                })
            }
        }
    }
}

impl Gateway for PgGateway {
    type Conn = PgConnection;

    fn run<T, F>(&self, op: F) -> impl Future<Output = AppResult<T>> + Send
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        async move {
            tokio::task::spawn_blocking(move || {
                let mut pooled = Self::checkout(&pool)?;
                op(&mut pooled)
            })
            .await
            .map_err(|e| AppError::internal(format!("blocking db task failed: {e}")))?
        }
    }

    fn transaction<T, F>(&self, op: F) -> impl Future<Output = AppResult<T>> + Send
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        async move {
            tokio::task::spawn_blocking(move || {
                let mut pooled = Self::checkout(&pool)?;
                let conn: &mut PgConnection = &mut pooled;
                conn.transaction(op)
            })
            .await
            .map_err(|e| AppError::internal(format!("blocking db task failed: {e}")))?
        }
    }

    fn ping(&self) -> impl Future<Output = AppResult<()>> + Send {
        self.run(|conn| {
            diesel::sql_query("SELECT 1").execute(conn)?;
            Ok(())
        })
    }
}

// --- Reports ---

impl ReportStore for PgConnection {
    fn create_report(&mut self, report: NewReport) -> AppResult<Report> {
        let report = diesel::insert_into(reports::table)
            .values(&report)
            .returning(Report::as_returning())
            .get_result(self)?;

        tracing::debug!(report_id = report.id, report_type = %report.report_type, "report created");
        Ok(report)
    }

    fn list_reports(&mut self, status: Option<ReportStatus>, limit: i64, offset: i64) -> AppResult<Vec<ReportListing>> {
        let rows = diesel::sql_query(
            "SELECT r.*, reporter.username AS reporter_name, reviewer.username AS reviewer_name \
             FROM reports r \
             LEFT JOIN users reporter ON reporter.discord_id = r.reporter_id \
             LEFT JOIN users reviewer ON reviewer.discord_id = r.reviewed_by \
             WHERE ($1::varchar IS NULL OR r.status = $1) \
             ORDER BY r.created_at DESC, r.id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind::<Nullable<Text>, _>(status.map(|s| s.as_str()))
        .bind::<BigInt, _>(limit)
        .bind::<BigInt, _>(offset)
        .load::<ReportListing>(self)?;

        Ok(rows)
    }

    fn count_reports(&mut self, status: Option<ReportStatus>) -> AppResult<i64> {
        let mut query = reports::table.into_boxed();
        if let Some(status) = status {
            query = query.filter(reports::status.eq(status.as_str()));
        }

        Ok(query.count().get_result(self)?)
    }

    fn find_report(&mut self, id: i64) -> AppResult<Option<Report>> {
        let report = reports::table
            .find(id)
            .select(Report::as_select())
            .first(self)
            .optional()?;

        Ok(report)
    }

    fn update_report_status(
        &mut self,
        id: i64,
        status: ReportStatus,
        reviewer_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let changed = diesel::update(reports::table.find(id))
            .set((
                reports::status.eq(status.as_str()),
                reports::reviewed_by.eq(reviewer_id),
                reports::reviewed_at.eq(now),
            ))
            .execute(self)?;

        Ok(changed > 0)
    }

    fn update_report_status_if(
        &mut self,
        id: i64,
        expected: ReportStatus,
        status: ReportStatus,
        reviewer_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let changed = diesel::update(
            reports::table
                .filter(reports::id.eq(id))
                .filter(reports::status.eq(expected.as_str())),
        )
        .set((
            reports::status.eq(status.as_str()),
            reports::reviewed_by.eq(reviewer_id),
            reports::reviewed_at.eq(now),
        ))
        .execute(self)?;

        Ok(changed > 0)
    }

    fn pending_reports(&mut self) -> AppResult<Vec<PendingReport>> {
        let rows = diesel::sql_query(
            "SELECT r.*, reporter.username AS reporter_name, \
                CASE r.report_type \
                    WHEN 'script' THEN s.title::text \
                    WHEN 'comment' THEN LEFT(c.content, 50) \
                    WHEN 'user' THEN target_user.username::text \
                END AS target_name \
             FROM reports r \
             LEFT JOIN users reporter ON reporter.discord_id = r.reporter_id \
             LEFT JOIN scripts s ON r.report_type = 'script' AND s.id::text = r.target_id \
             LEFT JOIN comments c ON r.report_type = 'comment' AND c.id::text = r.target_id \
             LEFT JOIN users target_user ON r.report_type = 'user' AND target_user.discord_id = r.target_id \
             WHERE r.status = 'pending' \
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .load::<PendingReport>(self)?;

        Ok(rows)
    }
}

// --- Strikes ---

impl StrikeStore for PgConnection {
    fn give_strike(&mut self, strike: NewStrike) -> AppResult<Strike> {
        let strike = diesel::insert_into(user_strikes::table)
            .values(&strike)
            .returning(Strike::as_returning())
            .get_result(self)?;

        Ok(strike)
    }

    fn find_strike(&mut self, id: i64) -> AppResult<Option<Strike>> {
        let strike = user_strikes::table
            .find(id)
            .select(Strike::as_select())
            .first(self)
            .optional()?;

        Ok(strike)
    }

    fn strike_history(&mut self, user_id: &str, active_only: bool, now: DateTime<Utc>) -> AppResult<Vec<Strike>> {
        let mut query = user_strikes::table
            .filter(user_strikes::user_id.eq(user_id))
            .select(Strike::as_select())
            .into_boxed();

        if active_only {
            query = query
                .filter(user_strikes::is_active.eq(true))
                .filter(user_strikes::expires_at.is_null().or(user_strikes::expires_at.gt(now)));
        }

        let strikes = query
            .order((user_strikes::created_at.desc(), user_strikes::id.desc()))
            .load(self)?;

        Ok(strikes)
    }

    fn strike_overview(&mut self, now: DateTime<Utc>) -> AppResult<Vec<StrikeSummary>> {
        let rows = diesel::sql_query(
            "SELECT s.user_id, u.username, COUNT(*) AS strike_count, \
                MAX(s.created_at) AS last_strike_date, \
                (SELECT s2.reason FROM user_strikes s2 \
                  WHERE s2.user_id = s.user_id AND s2.is_active \
                    AND (s2.expires_at IS NULL OR s2.expires_at > $1) \
                  ORDER BY s2.created_at DESC, s2.id DESC LIMIT 1) AS last_strike_reason \
             FROM user_strikes s \
             LEFT JOIN users u ON u.discord_id = s.user_id \
             WHERE s.is_active AND (s.expires_at IS NULL OR s.expires_at > $1) \
             GROUP BY s.user_id, u.username \
             ORDER BY strike_count DESC, last_strike_date DESC",
        )
        .bind::<Timestamptz, _>(now)
        .load::<StrikeSummary>(self)?;

        Ok(rows)
    }

    fn remove_strike(&mut self, id: i64, removed_by: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let changed = diesel::update(user_strikes::table.find(id))
            .set((
                user_strikes::is_active.eq(false),
                user_strikes::removed_by.eq(removed_by),
                user_strikes::removed_at.eq(now),
            ))
            .execute(self)?;

        Ok(changed > 0)
    }

    fn sweep_expired_strikes(&mut self, now: DateTime<Utc>) -> AppResult<usize> {
        let swept = diesel::update(
            user_strikes::table
                .filter(user_strikes::is_active.eq(true))
                .filter(user_strikes::expires_at.le(now)),
        )
        .set(user_strikes::is_active.eq(false))
        .execute(self)?;

        Ok(swept)
    }
}

// --- Content ---

impl ContentStore for PgConnection {
    fn find_script(&mut self, id: i64) -> AppResult<Option<ScriptRef>> {
        let script = scripts::table
            .find(id)
            .select((scripts::id, scripts::title, scripts::author_id, scripts::is_deleted))
            .first::<ScriptRef>(self)
            .optional()?;

        Ok(script)
    }

    fn soft_delete_script(&mut self, id: i64, deleted_by: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let changed = diesel::update(
            scripts::table
                .filter(scripts::id.eq(id))
                .filter(scripts::is_deleted.eq(false)),
        )
        .set((
            scripts::is_deleted.eq(true),
            scripts::deleted_at.eq(now),
            scripts::deleted_by.eq(deleted_by),
        ))
        .execute(self)?;

        Ok(changed > 0)
    }

    fn find_comment(&mut self, id: i64) -> AppResult<Option<CommentRef>> {
        let comment = comments::table
            .find(id)
            .select((
                comments::id,
                comments::script_id,
                comments::user_id,
                comments::content,
                comments::is_deleted,
            ))
            .first::<CommentRef>(self)
            .optional()?;

        Ok(comment)
    }

    fn soft_delete_comment(&mut self, id: i64, deleted_by: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let changed = diesel::update(
            comments::table
                .filter(comments::id.eq(id))
                .filter(comments::is_deleted.eq(false)),
        )
        .set((
            comments::is_deleted.eq(true),
            comments::deleted_at.eq(now),
            comments::deleted_by.eq(deleted_by),
            comments::updated_at.eq(now),
        ))
        .execute(self)?;

        Ok(changed > 0)
    }

    fn pending_scripts(&mut self) -> AppResult<Vec<PendingScript>> {
        let scripts = scripts::table
            .left_join(users::table.on(users::discord_id.nullable().eq(scripts::author_id)))
            .filter(scripts::is_pending.eq(true))
            .filter(scripts::is_deleted.eq(false))
            .order(scripts::created_at.desc())
            .select((
                scripts::id,
                scripts::title,
                scripts::author_id,
                users::username.nullable(),
                scripts::created_at,
            ))
            .load::<PendingScript>(self)?;

        Ok(scripts)
    }
}

// --- Audit ---

impl AuditStore for PgConnection {
    fn log_action(&mut self, entry: NewAuditLog) -> AppResult<()> {
        diesel::insert_into(audit_logs::table)
            .values(&entry)
            .execute(self)?;
        Ok(())
    }

    fn audit_logs(&mut self, filter: &AuditFilter, limit: i64, offset: i64) -> AppResult<(Vec<AuditLogEntry>, i64)> {
        let mut count_query = audit_logs::table.into_boxed();
        let mut query = audit_logs::table
            .left_join(users::table.on(users::discord_id.eq(audit_logs::admin_id)))
            .select((AuditLog::as_select(), users::username.nullable()))
            .into_boxed();

        if let Some(admin_id) = &filter.admin_id {
            count_query = count_query.filter(audit_logs::admin_id.eq(admin_id.clone()));
            query = query.filter(audit_logs::admin_id.eq(admin_id.clone()));
        }
        if let Some(action) = &filter.action {
            count_query = count_query.filter(audit_logs::action.eq(action.clone()));
            query = query.filter(audit_logs::action.eq(action.clone()));
        }

        let total: i64 = count_query.count().get_result(self)?;
        let rows = query
            .order((audit_logs::created_at.desc(), audit_logs::id.desc()))
            .limit(limit)
            .offset(offset)
            .load::<(AuditLog, Option<String>)>(self)?;

        let entries = rows
            .into_iter()
            .map(|(log, admin_name)| AuditLogEntry { log, admin_name })
            .collect();

        Ok((entries, total))
    }

    fn moderation_stats(&mut self, now: DateTime<Utc>) -> AppResult<ModerationStats> {
        let stats = diesel::sql_query(
            "SELECT \
                (SELECT COUNT(*) FROM reports WHERE status = 'pending') AS pending_reports, \
                (SELECT COUNT(*) FROM reports WHERE created_at >= $1) AS reports_this_week, \
                (SELECT COUNT(*) FROM user_strikes \
                  WHERE is_active AND (expires_at IS NULL OR expires_at > $3)) AS active_strikes, \
                (SELECT COUNT(*) FROM scripts WHERE is_deleted AND deleted_at >= $2) AS deleted_scripts_month, \
                (SELECT COUNT(*) FROM comments WHERE is_deleted AND deleted_at >= $2) AS deleted_comments_month",
        )
        .bind::<Timestamptz, _>(now - Duration::days(7))
        .bind::<Timestamptz, _>(now - Duration::days(30))
        .bind::<Timestamptz, _>(now)
        .get_result::<ModerationStats>(self)?;

        Ok(stats)
    }
}

// --- Notifications ---

impl NotificationStore for PgConnection {
    fn insert_notification(&mut self, notification: NewNotification) -> AppResult<Notification> {
        let notification = diesel::insert_into(notifications::table)
            .values(&notification)
            .returning(Notification::as_returning())
            .get_result(self)?;

        tracing::debug!(
            notification_id = notification.id,
            user_id = %notification.user_id,
            notification_type = %notification.notification_type,
            "notification created"
        );

        Ok(notification)
    }

    fn list_notifications(
        &mut self,
        user_id: &str,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Notification>, i64)> {
        let mut count_query = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .into_boxed();
        let mut query = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .select(Notification::as_select())
            .into_boxed();

        if unread_only {
            count_query = count_query.filter(notifications::is_read.eq(false));
            query = query.filter(notifications::is_read.eq(false));
        }

        let total: i64 = count_query.count().get_result(self)?;
        let items = query
            .order((notifications::created_at.desc(), notifications::id.desc()))
            .limit(limit)
            .offset(offset)
            .load(self)?;

        Ok((items, total))
    }

    fn count_unread(&mut self, user_id: &str) -> AppResult<i64> {
        let count = notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::is_read.eq(false))
            .count()
            .get_result(self)?;

        Ok(count)
    }

    fn mark_read(&mut self, id: i64, user_id: &str) -> AppResult<bool> {
        let changed = diesel::update(
            notifications::table
                .filter(notifications::id.eq(id))
                .filter(notifications::user_id.eq(user_id)),
        )
        .set(notifications::is_read.eq(true))
        .execute(self)?;

        Ok(changed > 0)
    }

    fn mark_all_read(&mut self, user_id: &str) -> AppResult<usize> {
        let updated = diesel::update(
            notifications::table
                .filter(notifications::user_id.eq(user_id))
                .filter(notifications::is_read.eq(false)),
        )
        .set(notifications::is_read.eq(true))
        .execute(self)?;

        Ok(updated)
    }

    fn delete_notification(&mut self, id: i64, user_id: &str) -> AppResult<bool> {
        let deleted = diesel::delete(
            notifications::table
                .filter(notifications::id.eq(id))
                .filter(notifications::user_id.eq(user_id)),
        )
        .execute(self)?;

        Ok(deleted > 0)
    }

    fn purge_notifications_before(&mut self, cutoff: DateTime<Utc>) -> AppResult<usize> {
        let deleted = diesel::delete(notifications::table.filter(notifications::created_at.lt(cutoff)))
            .execute(self)?;

        Ok(deleted)
    }
}
