//! In-memory gateway used by the unit tests.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use hopeleaks_shared::errors::{AppError, AppResult};

use crate::models::{
    AuditFilter, AuditLog, AuditLogEntry, CommentRef, ModerationStats, NewAuditLog, NewNotification, NewReport,
    NewStrike, Notification, PendingReport, PendingScript, Report, ReportListing, ReportStatus, ReportType,
    ScriptRef, Strike, StrikeSummary,
};
use crate::store::{AuditStore, ContentStore, Gateway, NotificationStore, ReportStore, StrikeStore};

type Hook = Box<dyn FnOnce(&mut MemoryDb) + Send>;

#[derive(Debug, Clone)]
pub struct MemScript {
    pub id: i64,
    pub title: String,
    pub author_id: Option<String>,
    pub is_pending: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MemComment {
    pub id: i64,
    pub script_id: i64,
    pub user_id: String,
    pub content: String,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    pub users: BTreeMap<String, String>,
    pub scripts: Vec<MemScript>,
    pub comments: Vec<MemComment>,
    pub reports: Vec<Report>,
    pub strikes: Vec<Strike>,
    pub notifications: Vec<Notification>,
    pub audit_logs: Vec<AuditLog>,
    /// Makes every report status write fail, to exercise rollback.
    pub fail_status_updates: bool,
    next_id: i64,
}

impl MemoryDb {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id + 1000
    }

    pub fn add_user(&mut self, id: &str, username: &str) {
        self.users.insert(id.to_string(), username.to_string());
    }

    pub fn add_script(&mut self, id: i64, title: &str, author_id: Option<&str>) {
        self.scripts.push(MemScript {
            id,
            title: title.to_string(),
            author_id: author_id.map(str::to_string),
            is_pending: false,
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
            created_at: Utc::now(),
        });
    }

    pub fn add_comment(&mut self, id: i64, script_id: i64, user_id: &str, content: &str) {
        self.comments.push(MemComment {
            id,
            script_id,
            user_id: user_id.to_string(),
            content: content.to_string(),
            is_deleted: false,
            deleted_at: None,
            deleted_by: None,
        });
    }

    /// Seeds a pending report with a fixed id.
    pub fn add_report(&mut self, id: i64, reporter_id: &str, report_type: ReportType, target_id: &str, reason: &str) {
        self.reports.push(Report {
            id,
            reporter_id: reporter_id.to_string(),
            report_type: report_type.as_str().to_string(),
            target_id: target_id.to_string(),
            reason: reason.to_string(),
            description: None,
            status: ReportStatus::Pending.as_str().to_string(),
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
        });
    }

    pub fn report(&self, id: i64) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn script(&self, id: i64) -> Option<&MemScript> {
        self.scripts.iter().find(|s| s.id == id)
    }

    pub fn comment(&self, id: i64) -> Option<&MemComment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn notifications_for(&self, user_id: &str) -> Vec<&Notification> {
        self.notifications.iter().filter(|n| n.user_id == user_id).collect()
    }

    fn username(&self, id: &str) -> Option<String> {
        self.users.get(id).cloned()
    }

    fn set_status(&mut self, id: i64, expected: Option<ReportStatus>, status: ReportStatus, reviewer_id: &str, now: DateTime<Utc>) -> AppResult<bool> {
        if self.fail_status_updates {
            return Err(AppError::unavailable("database connection error"));
        }

        let Some(report) = self.reports.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };
        if let Some(expected) = expected {
            if report.status != expected.as_str() {
                return Ok(false);
            }
        }

        report.status = status.as_str().to_string();
        report.reviewed_by = Some(reviewer_id.to_string());
        report.reviewed_at = Some(now);
        Ok(true)
    }
}

/// Shares one [`MemoryDb`]; transactions work on a copy that replaces the
/// original only when the closure returns `Ok`.
#[derive(Clone, Default)]
pub struct MemoryGateway {
    db: Arc<Mutex<MemoryDb>>,
    before_transaction: Arc<Mutex<Option<Hook>>>,
}

impl MemoryGateway {
    pub fn new(db: MemoryDb) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            before_transaction: Arc::default(),
        }
    }

    pub fn inspect<R>(&self, f: impl FnOnce(&MemoryDb) -> R) -> R {
        f(&self.db.lock().expect("memory db poisoned"))
    }

    pub fn modify<R>(&self, f: impl FnOnce(&mut MemoryDb) -> R) -> R {
        f(&mut self.db.lock().expect("memory db poisoned"))
    }

    /// Runs `hook` against the committed state right before the next
    /// transaction starts, as another request would.
    pub fn before_next_transaction(&self, hook: impl FnOnce(&mut MemoryDb) + Send + 'static) {
        *self.before_transaction.lock().expect("hook poisoned") = Some(Box::new(hook));
    }
}

impl Gateway for MemoryGateway {
    type Conn = MemoryDb;

    fn run<T, F>(&self, op: F) -> impl Future<Output = AppResult<T>> + Send
    where
        T: Send + 'static,
        F: FnOnce(&mut MemoryDb) -> AppResult<T> + Send + 'static,
    {
        let db = self.db.clone();
        async move {
            let mut guard = db.lock().expect("memory db poisoned");
            op(&mut guard)
        }
    }

    fn transaction<T, F>(&self, op: F) -> impl Future<Output = AppResult<T>> + Send
    where
        T: Send + 'static,
        F: FnOnce(&mut MemoryDb) -> AppResult<T> + Send + 'static,
    {
        let db = self.db.clone();
        let hook = self.before_transaction.lock().expect("hook poisoned").take();
        async move {
            let mut guard = db.lock().expect("memory db poisoned");
            if let Some(hook) = hook {
                hook(&mut guard);
            }

            let mut working = guard.clone();
            let result = op(&mut working)?;
            *guard = working;
            Ok(result)
        }
    }
}

impl ReportStore for MemoryDb {
    fn create_report(&mut self, report: NewReport) -> AppResult<Report> {
        let report = Report {
            id: self.next_id(),
            reporter_id: report.reporter_id,
            report_type: report.report_type,
            target_id: report.target_id,
            reason: report.reason,
            description: report.description,
            status: ReportStatus::Pending.as_str().to_string(),
            reviewed_by: None,
            reviewed_at: None,
            created_at: Utc::now(),
        };
        self.reports.push(report.clone());
        Ok(report)
    }

    fn list_reports(&mut self, status: Option<ReportStatus>, limit: i64, offset: i64) -> AppResult<Vec<ReportListing>> {
        let mut reports: Vec<&Report> = self
            .reports
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s.as_str()))
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(reports
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|r| ReportListing {
                report: r.clone(),
                reporter_name: self.username(&r.reporter_id),
                reviewer_name: r.reviewed_by.as_deref().and_then(|id| self.username(id)),
            })
            .collect())
    }

    fn count_reports(&mut self, status: Option<ReportStatus>) -> AppResult<i64> {
        Ok(self
            .reports
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s.as_str()))
            .count() as i64)
    }

    fn find_report(&mut self, id: i64) -> AppResult<Option<Report>> {
        Ok(self.report(id).cloned())
    }

    fn update_report_status(&mut self, id: i64, status: ReportStatus, reviewer_id: &str, now: DateTime<Utc>) -> AppResult<bool> {
        self.set_status(id, None, status, reviewer_id, now)
    }

    fn update_report_status_if(
        &mut self,
        id: i64,
        expected: ReportStatus,
        status: ReportStatus,
        reviewer_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        self.set_status(id, Some(expected), status, reviewer_id, now)
    }

    fn pending_reports(&mut self) -> AppResult<Vec<PendingReport>> {
        let pending = self
            .reports
            .iter()
            .filter(|r| r.status == ReportStatus::Pending.as_str())
            .map(|r| {
                let target_name = match r.report_type.as_str() {
                    "script" => self
                        .scripts
                        .iter()
                        .find(|s| s.id.to_string() == r.target_id)
                        .map(|s| s.title.clone()),
                    "comment" => self
                        .comments
                        .iter()
                        .find(|c| c.id.to_string() == r.target_id)
                        .map(|c| c.content.chars().take(50).collect()),
                    _ => self.username(&r.target_id),
                };
                PendingReport {
                    report: r.clone(),
                    reporter_name: self.username(&r.reporter_id),
                    target_name,
                }
            })
            .collect();

        Ok(pending)
    }
}

impl StrikeStore for MemoryDb {
    fn give_strike(&mut self, strike: NewStrike) -> AppResult<Strike> {
        let strike = Strike {
            id: self.next_id(),
            user_id: strike.user_id,
            reason: strike.reason,
            given_by: strike.given_by,
            expires_at: strike.expires_at,
            is_active: true,
            removed_by: None,
            removed_at: None,
            created_at: Utc::now(),
        };
        self.strikes.push(strike.clone());
        Ok(strike)
    }

    fn find_strike(&mut self, id: i64) -> AppResult<Option<Strike>> {
        Ok(self.strikes.iter().find(|s| s.id == id).cloned())
    }

    fn strike_history(&mut self, user_id: &str, active_only: bool, now: DateTime<Utc>) -> AppResult<Vec<Strike>> {
        let mut strikes: Vec<Strike> = self
            .strikes
            .iter()
            .filter(|s| s.user_id == user_id && (!active_only || s.is_in_force(now)))
            .cloned()
            .collect();
        strikes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(strikes)
    }

    fn strike_overview(&mut self, now: DateTime<Utc>) -> AppResult<Vec<StrikeSummary>> {
        let mut by_user: BTreeMap<&str, Vec<&Strike>> = BTreeMap::new();
        for strike in self.strikes.iter().filter(|s| s.is_in_force(now)) {
            by_user.entry(strike.user_id.as_str()).or_default().push(strike);
        }

        let mut overview: Vec<StrikeSummary> = by_user
            .into_iter()
            .filter_map(|(user_id, strikes)| {
                let latest = strikes.iter().max_by_key(|s| (s.created_at, s.id))?;
                Some(StrikeSummary {
                    user_id: user_id.to_string(),
                    username: self.username(user_id),
                    strike_count: strikes.len() as i64,
                    last_strike_date: latest.created_at,
                    last_strike_reason: Some(latest.reason.clone()),
                })
            })
            .collect();
        overview.sort_by(|a, b| {
            b.strike_count
                .cmp(&a.strike_count)
                .then(b.last_strike_date.cmp(&a.last_strike_date))
        });

        Ok(overview)
    }

    fn remove_strike(&mut self, id: i64, removed_by: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let Some(strike) = self.strikes.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };
        strike.is_active = false;
        strike.removed_by = Some(removed_by.to_string());
        strike.removed_at = Some(now);
        Ok(true)
    }

    fn sweep_expired_strikes(&mut self, now: DateTime<Utc>) -> AppResult<usize> {
        let mut swept = 0;
        for strike in self.strikes.iter_mut() {
            if strike.is_active && strike.expires_at.is_some_and(|expires| expires <= now) {
                strike.is_active = false;
                swept += 1;
            }
        }
        Ok(swept)
    }
}

impl ContentStore for MemoryDb {
    fn find_script(&mut self, id: i64) -> AppResult<Option<ScriptRef>> {
        Ok(self.script(id).map(|s| ScriptRef {
            id: s.id,
            title: s.title.clone(),
            author_id: s.author_id.clone(),
            is_deleted: s.is_deleted,
        }))
    }

    fn soft_delete_script(&mut self, id: i64, deleted_by: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let Some(script) = self.scripts.iter_mut().find(|s| s.id == id && !s.is_deleted) else {
            return Ok(false);
        };
        script.is_deleted = true;
        script.deleted_at = Some(now);
        script.deleted_by = Some(deleted_by.to_string());
        Ok(true)
    }

    fn find_comment(&mut self, id: i64) -> AppResult<Option<CommentRef>> {
        Ok(self.comment(id).map(|c| CommentRef {
            id: c.id,
            script_id: c.script_id,
            user_id: c.user_id.clone(),
            content: c.content.clone(),
            is_deleted: c.is_deleted,
        }))
    }

    fn soft_delete_comment(&mut self, id: i64, deleted_by: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let Some(comment) = self.comments.iter_mut().find(|c| c.id == id && !c.is_deleted) else {
            return Ok(false);
        };
        comment.is_deleted = true;
        comment.deleted_at = Some(now);
        comment.deleted_by = Some(deleted_by.to_string());
        Ok(true)
    }

    fn pending_scripts(&mut self) -> AppResult<Vec<PendingScript>> {
        Ok(self
            .scripts
            .iter()
            .filter(|s| s.is_pending && !s.is_deleted)
            .map(|s| PendingScript {
                id: s.id,
                title: s.title.clone(),
                author_id: s.author_id.clone(),
                author_name: s.author_id.as_deref().and_then(|id| self.username(id)),
                created_at: s.created_at,
            })
            .collect())
    }
}

impl AuditStore for MemoryDb {
    fn log_action(&mut self, entry: NewAuditLog) -> AppResult<()> {
        let log = AuditLog {
            id: self.next_id(),
            admin_id: entry.admin_id,
            action: entry.action,
            target_type: entry.target_type,
            target_id: entry.target_id,
            details: entry.details,
            ip_address: entry.ip_address,
            created_at: Utc::now(),
        };
        self.audit_logs.push(log);
        Ok(())
    }

    fn audit_logs(&mut self, filter: &AuditFilter, limit: i64, offset: i64) -> AppResult<(Vec<AuditLogEntry>, i64)> {
        let matching: Vec<&AuditLog> = self
            .audit_logs
            .iter()
            .rev()
            .filter(|l| filter.admin_id.as_ref().map_or(true, |a| &l.admin_id == a))
            .filter(|l| filter.action.as_ref().map_or(true, |a| &l.action == a))
            .collect();
        let total = matching.len() as i64;

        let entries = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|log| AuditLogEntry {
                log: log.clone(),
                admin_name: self.username(&log.admin_id),
            })
            .collect();

        Ok((entries, total))
    }

    fn moderation_stats(&mut self, now: DateTime<Utc>) -> AppResult<ModerationStats> {
        let week_ago = now - Duration::days(7);
        let month_ago = now - Duration::days(30);
        let recent = |deleted_at: Option<DateTime<Utc>>| deleted_at.is_some_and(|at| at >= month_ago);

        Ok(ModerationStats {
            pending_reports: self
                .reports
                .iter()
                .filter(|r| r.status == ReportStatus::Pending.as_str())
                .count() as i64,
            reports_this_week: self.reports.iter().filter(|r| r.created_at >= week_ago).count() as i64,
            active_strikes: self.strikes.iter().filter(|s| s.is_in_force(now)).count() as i64,
            deleted_scripts_month: self
                .scripts
                .iter()
                .filter(|s| s.is_deleted && recent(s.deleted_at))
                .count() as i64,
            deleted_comments_month: self
                .comments
                .iter()
                .filter(|c| c.is_deleted && recent(c.deleted_at))
                .count() as i64,
        })
    }
}

impl NotificationStore for MemoryDb {
    fn insert_notification(&mut self, notification: NewNotification) -> AppResult<Notification> {
        let notification = Notification {
            id: self.next_id(),
            user_id: notification.user_id,
            notification_type: notification.notification_type,
            title: notification.title,
            message: notification.message,
            data: notification.data,
            is_read: false,
            created_at: Utc::now(),
        };
        self.notifications.push(notification.clone());
        Ok(notification)
    }

    fn list_notifications(
        &mut self,
        user_id: &str,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> AppResult<(Vec<Notification>, i64)> {
        let matching: Vec<&Notification> = self
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.is_read))
            .collect();
        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }

    fn count_unread(&mut self, user_id: &str) -> AppResult<i64> {
        Ok(self
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as i64)
    }

    fn mark_read(&mut self, id: i64, user_id: &str) -> AppResult<bool> {
        let Some(notification) = self
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        else {
            return Ok(false);
        };
        notification.is_read = true;
        Ok(true)
    }

    fn mark_all_read(&mut self, user_id: &str) -> AppResult<usize> {
        let mut updated = 0;
        for notification in self
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            notification.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }

    fn delete_notification(&mut self, id: i64, user_id: &str) -> AppResult<bool> {
        let before = self.notifications.len();
        self.notifications.retain(|n| !(n.id == id && n.user_id == user_id));
        Ok(self.notifications.len() < before)
    }

    fn purge_notifications_before(&mut self, cutoff: DateTime<Utc>) -> AppResult<usize> {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.created_at >= cutoff);
        Ok(before - self.notifications.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes_ago(minutes: i64) -> DateTime<Utc> {
        Utc::now() - Duration::minutes(minutes)
    }

    fn reports_db() -> MemoryDb {
        let mut db = MemoryDb::default();
        db.add_user("u1", "reporter");
        db.add_user("admin1", "moderator");
        db.add_user("troll", "trollface");
        db.add_script(10, "Aimbot v2", Some("author1"));
        db.add_comment(7, 10, "commenter", &"a".repeat(80));
        db.add_report(41, "u1", ReportType::Script, "10", "malware");
        db.add_report(42, "u1", ReportType::Comment, "7", "spam");
        db.add_report(43, "u1", ReportType::User, "troll", "harassment");
        for (id, age) in [(41, 30), (42, 10), (43, 20)] {
            if let Some(report) = db.reports.iter_mut().find(|r| r.id == id) {
                report.created_at = minutes_ago(age);
            }
        }
        db
    }

    fn ids(listing: &[ReportListing]) -> Vec<i64> {
        listing.iter().map(|l| l.report.id).collect()
    }

    fn strike_at(db: &mut MemoryDb, user_id: &str, reason: &str, created_at: DateTime<Utc>) -> i64 {
        let id = db
            .give_strike(NewStrike::new(user_id, reason, "admin1", None, created_at).unwrap())
            .unwrap()
            .id;
        db.strikes.iter_mut().find(|s| s.id == id).unwrap().created_at = created_at;
        id
    }

    #[test]
    fn reports_are_listed_newest_first_across_statuses() {
        let mut db = reports_db();
        db.update_report_status(43, ReportStatus::Dismissed, "admin1", Utc::now()).unwrap();

        let all = db.list_reports(None, 20, 0).unwrap();
        assert_eq!(ids(&all), vec![42, 43, 41]);
        assert_eq!(db.count_reports(None).unwrap(), 3);
        assert_eq!(all[0].reporter_name.as_deref(), Some("reporter"));
        assert_eq!(all[1].reviewer_name.as_deref(), Some("moderator"));
        assert_eq!(all[0].reviewer_name, None);

        let pending = db.list_reports(Some(ReportStatus::Pending), 20, 0).unwrap();
        assert_eq!(ids(&pending), vec![42, 41]);
        assert_eq!(db.count_reports(Some(ReportStatus::Pending)).unwrap(), 2);

        assert_eq!(ids(&db.list_reports(None, 1, 1).unwrap()), vec![43]);
    }

    #[test]
    fn pending_reports_label_their_targets() {
        let mut db = reports_db();
        db.add_report(44, "u1", ReportType::Script, "10", "stolen");
        db.update_report_status(44, ReportStatus::Resolved, "admin1", Utc::now()).unwrap();

        let pending = db.pending_reports().unwrap();
        let label = |id: i64| {
            pending
                .iter()
                .find(|p| p.report.id == id)
                .and_then(|p| p.target_name.clone())
        };

        assert_eq!(pending.len(), 3);
        assert_eq!(label(41).as_deref(), Some("Aimbot v2"));
        assert_eq!(label(42), Some("a".repeat(50)));
        assert_eq!(label(43).as_deref(), Some("trollface"));
        assert!(pending.iter().all(|p| p.reporter_name.as_deref() == Some("reporter")));
    }

    #[test]
    fn strike_overview_counts_only_strikes_in_force() {
        let now = Utc::now();
        let mut db = MemoryDb::default();
        db.add_user("alice", "Alice");
        db.add_user("bob", "Bob");
        db.add_user("carol", "Carol");

        strike_at(&mut db, "alice", "first", minutes_ago(180));
        strike_at(&mut db, "alice", "second", minutes_ago(60));
        let expired = strike_at(&mut db, "alice", "expired", minutes_ago(5));
        db.strikes.iter_mut().find(|s| s.id == expired).unwrap().expires_at = Some(minutes_ago(1));

        strike_at(&mut db, "bob", "spam", minutes_ago(120));
        strike_at(&mut db, "bob", "more spam", minutes_ago(30));

        strike_at(&mut db, "carol", "rude", minutes_ago(240));
        let removed = strike_at(&mut db, "carol", "appealed", minutes_ago(2));
        db.remove_strike(removed, "admin1", now).unwrap();

        let old = strike_at(&mut db, "dave", "ancient", minutes_ago(600));
        db.strikes.iter_mut().find(|s| s.id == old).unwrap().expires_at = Some(minutes_ago(300));

        let overview = db.strike_overview(now).unwrap();
        let rows: Vec<(&str, i64, Option<&str>)> = overview
            .iter()
            .map(|s| (s.user_id.as_str(), s.strike_count, s.last_strike_reason.as_deref()))
            .collect();

        assert_eq!(
            rows,
            vec![
                ("bob", 2, Some("more spam")),
                ("alice", 2, Some("second")),
                ("carol", 1, Some("rude")),
            ]
        );
        assert_eq!(overview[0].username.as_deref(), Some("Bob"));
    }

    #[test]
    fn active_strikes_skip_expired_and_removed() {
        let now = Utc::now();
        let mut db = MemoryDb::default();
        let kept = strike_at(&mut db, "alice", "kept", minutes_ago(10));
        let expired = strike_at(&mut db, "alice", "expired", minutes_ago(5));
        db.strikes.iter_mut().find(|s| s.id == expired).unwrap().expires_at = Some(minutes_ago(1));
        let removed = strike_at(&mut db, "alice", "removed", minutes_ago(3));
        db.remove_strike(removed, "admin1", now).unwrap();

        let active: Vec<i64> = db.active_strikes("alice", now).unwrap().iter().map(|s| s.id).collect();
        assert_eq!(active, vec![kept]);
        assert_eq!(db.strike_history("alice", false, now).unwrap().len(), 3);
    }
}
