use serde_json::json;

use crate::models::{NewNotification, Report, ReportStatus, Strike};
use crate::moderation::executor::{ActionOutcome, AffectedContent};

pub const SCRIPT_MODERATION: &str = "script_moderation";
pub const COMMENT_MODERATION: &str = "comment_moderation";
pub const USER_STRIKE: &str = "user_strike";
pub const STRIKE_REMOVED: &str = "strike_removed";
pub const REPORT_UPDATE: &str = "report_update";

/// Notice for whoever the content action hit, if anyone.
pub fn for_outcome(report: &Report, outcome: &ActionOutcome) -> Option<NewNotification> {
    let recipient = outcome.affected_user_id.as_deref()?;

    let notice = match &outcome.content {
        AffectedContent::Script { id, title } => NewNotification::new(
            recipient,
            SCRIPT_MODERATION,
            "Script Removed",
            format!("Your script \"{title}\" has been removed due to a violation report."),
            json!({ "scriptId": id, "scriptTitle": title, "reason": report.reason }),
        ),
        AffectedContent::Comment { id, script_id } => NewNotification::new(
            recipient,
            COMMENT_MODERATION,
            "Comment Removed",
            "Your comment has been removed due to a violation report.",
            json!({ "scriptId": script_id, "commentId": id, "reason": report.reason }),
        ),
        AffectedContent::UserStrike { strike_id, reason } => NewNotification::new(
            recipient,
            USER_STRIKE,
            "Account Warning",
            "You have received a strike for violating community guidelines.",
            json!({ "reason": reason, "reportId": report.id, "strikeId": strike_id }),
        ),
    };

    Some(notice)
}

pub fn report_update(report: &Report, status: ReportStatus) -> NewNotification {
    NewNotification::new(
        &report.reporter_id,
        REPORT_UPDATE,
        "Report Update",
        format!("Your report has been {status}."),
        json!({
            "reportId": report.id,
            "reportType": report.report_type,
            "targetId": report.target_id,
            "status": status,
        }),
    )
}

pub fn strike_given(strike: &Strike, expires_in_days: Option<u32>) -> NewNotification {
    NewNotification::new(
        &strike.user_id,
        USER_STRIKE,
        "Account Warning",
        "You have received a strike from a moderator.",
        json!({ "reason": strike.reason, "strikeId": strike.id, "expiresInDays": expires_in_days }),
    )
}

pub fn strike_removed(strike: &Strike) -> NewNotification {
    NewNotification::new(
        &strike.user_id,
        STRIKE_REMOVED,
        "Strike Removed",
        "A strike has been removed from your account.",
        json!({ "strikeId": strike.id, "originalReason": strike.reason }),
    )
}
