use chrono::{DateTime, Utc};

use hopeleaks_shared::errors::AppResult;

use crate::models::{NewStrike, Report, ReportTarget};
use crate::moderation::action::{Enforcement, ResolutionAction};
use crate::store::{ContentStore, StrikeStore};

/// What a content action touched, for notifying the right person.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    /// Author of the removed content or the struck user; `None` for
    /// content without a known author.
    pub affected_user_id: Option<String>,
    pub content: AffectedContent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AffectedContent {
    Script { id: i64, title: String },
    Comment { id: i64, script_id: i64 },
    UserStrike { strike_id: i64, reason: String },
}

/// Applies the side effect a resolved report calls for.
///
/// Runs inside the caller's transaction. Content that no longer exists is
/// not an error: the action becomes a no-op and `None` is returned.
#[derive(Debug, Clone)]
pub struct ContentActionExecutor {
    strike_expiry_days: Option<u32>,
}

impl ContentActionExecutor {
    /// `strike_expiry_days = None` issues permanent strikes.
    pub fn new(strike_expiry_days: Option<u32>) -> Self {
        Self { strike_expiry_days }
    }

    pub fn execute<C>(
        &self,
        conn: &mut C,
        report: &Report,
        action: ResolutionAction,
        admin_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ActionOutcome>>
    where
        C: ContentStore + StrikeStore,
    {
        let ResolutionAction::Enforce(enforcement) = action else {
            return Ok(None);
        };

        let target = match report.target() {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(report_id = report.id, error = %e, "report target is unusable, skipping content action");
                return Ok(None);
            }
        };

        match (enforcement, target) {
            (Enforcement::Auto | Enforcement::DeleteContent, ReportTarget::Script(id)) => {
                self.remove_script(conn, report, id, admin_id, now)
            }
            (Enforcement::Auto | Enforcement::DeleteContent, ReportTarget::Comment(id)) => {
                self.remove_comment(conn, report, id, admin_id, now)
            }
            (Enforcement::Auto | Enforcement::StrikeUser, ReportTarget::User(user_id)) => {
                self.strike(conn, report, &user_id, admin_id, now).map(Some)
            }
            (Enforcement::DeleteContent, ReportTarget::User(user_id)) => {
                tracing::debug!(report_id = report.id, user_id = %user_id, "nothing to delete for a user report");
                Ok(None)
            }
            (Enforcement::StrikeUser, ReportTarget::Script(id)) => {
                let author = conn.find_script(id)?.and_then(|s| s.author_id);
                self.strike_author(conn, report, author, admin_id, now)
            }
            (Enforcement::StrikeUser, ReportTarget::Comment(id)) => {
                let author = conn.find_comment(id)?.map(|c| c.user_id);
                self.strike_author(conn, report, author, admin_id, now)
            }
        }
    }

    fn remove_script<C: ContentStore>(
        &self,
        conn: &mut C,
        report: &Report,
        script_id: i64,
        admin_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ActionOutcome>> {
        let Some(script) = conn.find_script(script_id)? else {
            tracing::warn!(report_id = report.id, script_id, "reported script no longer exists");
            return Ok(None);
        };

        if !conn.soft_delete_script(script_id, admin_id, now)? {
            tracing::debug!(report_id = report.id, script_id, "script was already deleted");
        }

        tracing::info!(report_id = report.id, script_id, admin_id, "script removed after report");
        Ok(Some(ActionOutcome {
            affected_user_id: script.author_id,
            content: AffectedContent::Script {
                id: script.id,
                title: script.title,
            },
        }))
    }

    fn remove_comment<C: ContentStore>(
        &self,
        conn: &mut C,
        report: &Report,
        comment_id: i64,
        admin_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ActionOutcome>> {
        let Some(comment) = conn.find_comment(comment_id)? else {
            tracing::warn!(report_id = report.id, comment_id, "reported comment no longer exists");
            return Ok(None);
        };

        if !conn.soft_delete_comment(comment_id, admin_id, now)? {
            tracing::debug!(report_id = report.id, comment_id, "comment was already deleted");
        }

        tracing::info!(report_id = report.id, comment_id, admin_id, "comment removed after report");
        Ok(Some(ActionOutcome {
            affected_user_id: Some(comment.user_id),
            content: AffectedContent::Comment {
                id: comment.id,
                script_id: comment.script_id,
            },
        }))
    }

    fn strike_author<C: StrikeStore>(
        &self,
        conn: &mut C,
        report: &Report,
        author: Option<String>,
        admin_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<ActionOutcome>> {
        match author {
            Some(user_id) => self.strike(conn, report, &user_id, admin_id, now).map(Some),
            None => {
                tracing::warn!(report_id = report.id, "reported content has no author to strike");
                Ok(None)
            }
        }
    }

    fn strike<C: StrikeStore>(
        &self,
        conn: &mut C,
        report: &Report,
        user_id: &str,
        admin_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<ActionOutcome> {
        let reason = format!("Received report: {}", report.reason);
        let strike = conn.give_strike(NewStrike::new(user_id, reason, admin_id, self.strike_expiry_days, now)?)?;

        metrics::counter!("moderation_strikes_issued_total", "source" => "report").increment(1);
        tracing::info!(report_id = report.id, strike_id = strike.id, user_id, admin_id, "strike issued after report");

        Ok(ActionOutcome {
            affected_user_id: Some(strike.user_id),
            content: AffectedContent::UserStrike {
                strike_id: strike.id,
                reason: strike.reason,
            },
        })
    }
}
