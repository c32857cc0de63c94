use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable, Text, Timestamptz};
use serde::{Deserialize, Serialize};

use hopeleaks_shared::errors::{AppError, AppResult, ErrorCode};

use crate::schema::{audit_logs, notifications, reports, user_strikes};

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

// --- Report ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Script,
    Comment,
    User,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Script => "script",
            ReportType::Comment => "comment",
            ReportType::User => "user",
        }
    }
}

impl FromStr for ReportType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "script" => Ok(ReportType::Script),
            "comment" => Ok(ReportType::Comment),
            "user" => Ok(ReportType::User),
            _ => Err(UnknownVariant::new("report type", s)),
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Resolved,
    Dismissed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Reviewed => "reviewed",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReportStatus::Pending)
    }
}

impl FromStr for ReportStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "reviewed" => Ok(ReportStatus::Reviewed),
            "resolved" => Ok(ReportStatus::Resolved),
            "dismissed" => Ok(ReportStatus::Dismissed),
            _ => Err(UnknownVariant::new("report status", s)),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reported entity, with `target_id` interpreted according to the report type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    Script(i64),
    Comment(i64),
    User(String),
}

impl ReportTarget {
    pub fn parse(kind: ReportType, target_id: &str) -> Result<Self, UnknownVariant> {
        let numeric = || {
            target_id
                .trim()
                .parse::<i64>()
                .map_err(|_| UnknownVariant::new("target id", target_id))
        };

        match kind {
            ReportType::Script => numeric().map(ReportTarget::Script),
            ReportType::Comment => numeric().map(ReportTarget::Comment),
            ReportType::User if target_id.trim().is_empty() => Err(UnknownVariant::new("target id", target_id)),
            ReportType::User => Ok(ReportTarget::User(target_id.trim().to_string())),
        }
    }

    pub fn kind(&self) -> ReportType {
        match self {
            ReportTarget::Script(_) => ReportType::Script,
            ReportTarget::Comment(_) => ReportType::Comment,
            ReportTarget::User(_) => ReportType::User,
        }
    }
}

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Identifiable, Serialize)]
#[diesel(table_name = reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Report {
    pub id: i64,
    pub reporter_id: String,
    pub report_type: String,
    pub target_id: String,
    pub reason: String,
    pub description: Option<String>,
    pub status: String,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn kind(&self) -> AppResult<ReportType> {
        self.report_type
            .parse()
            .map_err(|e: UnknownVariant| AppError::internal(format!("report {}: {e}", self.id)))
    }

    pub fn current_status(&self) -> AppResult<ReportStatus> {
        self.status
            .parse()
            .map_err(|e: UnknownVariant| AppError::internal(format!("report {}: {e}", self.id)))
    }

    pub fn target(&self) -> AppResult<ReportTarget> {
        ReportTarget::parse(self.kind()?, &self.target_id)
            .map_err(|e| AppError::internal(format!("report {}: {e}", self.id)))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reports)]
pub struct NewReport {
    pub reporter_id: String,
    pub report_type: String,
    pub target_id: String,
    pub reason: String,
    pub description: Option<String>,
}

impl NewReport {
    pub fn new(
        reporter_id: impl Into<String>,
        target: &ReportTarget,
        reason: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        let target_id = match target {
            ReportTarget::Script(id) | ReportTarget::Comment(id) => id.to_string(),
            ReportTarget::User(id) => id.clone(),
        };
        Self {
            reporter_id: reporter_id.into(),
            report_type: target.kind().as_str().to_string(),
            target_id,
            reason: reason.into(),
            description,
        }
    }
}

/// Report row with the display names of the people involved.
#[derive(Debug, Clone, QueryableByName, Serialize)]
pub struct ReportListing {
    #[diesel(embed)]
    #[serde(flatten)]
    pub report: Report,
    #[diesel(sql_type = Nullable<Text>)]
    pub reporter_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub reviewer_name: Option<String>,
}

/// Pending report with a human-readable label for what it points at.
#[derive(Debug, Clone, QueryableByName, Serialize)]
pub struct PendingReport {
    #[diesel(embed)]
    #[serde(flatten)]
    pub report: Report,
    #[diesel(sql_type = Nullable<Text>)]
    pub reporter_name: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub target_name: Option<String>,
}

// --- Strike ---

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = user_strikes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Strike {
    pub id: i64,
    pub user_id: String,
    pub reason: String,
    pub given_by: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub removed_by: Option<String>,
    pub removed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Strike {
    /// Counts towards the user's record: flagged active and not yet expired.
    pub fn is_in_force(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.map_or(true, |expires| expires > now)
    }
}

/// Longest strike lifetime accepted anywhere, about a century.
pub const MAX_STRIKE_DAYS: u32 = 36_500;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_strikes)]
pub struct NewStrike {
    pub user_id: String,
    pub reason: String,
    pub given_by: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewStrike {
    /// `expires_in_days = None` issues a permanent strike. Lifetimes past
    /// [`MAX_STRIKE_DAYS`] are rejected.
    pub fn new(
        user_id: impl Into<String>,
        reason: impl Into<String>,
        given_by: impl Into<String>,
        expires_in_days: Option<u32>,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        let expires_at = expires_in_days
            .map(|days| {
                (days <= MAX_STRIKE_DAYS)
                    .then(|| now.checked_add_signed(Duration::days(i64::from(days))))
                    .flatten()
                    .ok_or_else(|| {
                        AppError::new(
                            ErrorCode::ValidationError,
                            format!("strike expiry must be at most {MAX_STRIKE_DAYS} days"),
                        )
                    })
            })
            .transpose()?;

        Ok(Self {
            user_id: user_id.into(),
            reason: reason.into(),
            given_by: given_by.into(),
            expires_at,
        })
    }
}

/// Per-user aggregate of strikes currently in force.
#[derive(Debug, Clone, QueryableByName, Serialize, PartialEq)]
pub struct StrikeSummary {
    #[diesel(sql_type = Text)]
    pub user_id: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub username: Option<String>,
    #[diesel(sql_type = BigInt)]
    pub strike_count: i64,
    #[diesel(sql_type = Timestamptz)]
    pub last_strike_date: DateTime<Utc>,
    #[diesel(sql_type = Nullable<Text>)]
    pub last_strike_reason: Option<String>,
}

// --- Content ---

#[derive(Debug, Clone, Queryable, Serialize)]
pub struct ScriptRef {
    pub id: i64,
    pub title: String,
    pub author_id: Option<String>,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Queryable, Serialize)]
pub struct PendingScript {
    pub id: i64,
    pub title: String,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Serialize)]
pub struct CommentRef {
    pub id: i64,
    pub script_id: i64,
    pub user_id: String,
    pub content: String,
    pub is_deleted: bool,
}

// --- Notification ---

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Notification {
    pub id: i64,
    pub user_id: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, PartialEq)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub user_id: String,
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl NewNotification {
    pub fn new(
        user_id: impl Into<String>,
        notification_type: &str,
        title: &str,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            notification_type: notification_type.to_string(),
            title: title.to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

// --- Audit log ---

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = audit_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuditLog {
    pub id: i64,
    pub admin_id: String,
    pub action: String,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditLogEntry {
    #[serde(flatten)]
    pub log: AuditLog,
    pub admin_name: Option<String>,
}

#[derive(Debug, Clone, Insertable, PartialEq)]
#[diesel(table_name = audit_logs)]
pub struct NewAuditLog {
    pub admin_id: String,
    pub action: String,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
}

impl NewAuditLog {
    pub fn new(admin_id: impl Into<String>, action: &str) -> Self {
        Self {
            admin_id: admin_id.into(),
            action: action.to_string(),
            target_type: None,
            target_id: None,
            details: None,
            ip_address: None,
        }
    }

    pub fn target(mut self, target_type: &str, target_id: impl ToString) -> Self {
        self.target_type = Some(target_type.to_string());
        self.target_id = Some(target_id.to_string());
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn ip(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditFilter {
    pub admin_id: Option<String>,
    pub action: Option<String>,
}

// --- Dashboard ---

#[derive(Debug, Clone, Default, QueryableByName, Serialize, PartialEq)]
pub struct ModerationStats {
    #[diesel(sql_type = BigInt)]
    pub pending_reports: i64,
    #[diesel(sql_type = BigInt)]
    pub reports_this_week: i64,
    #[diesel(sql_type = BigInt)]
    pub active_strikes: i64,
    #[diesel(sql_type = BigInt)]
    pub deleted_scripts_month: i64,
    #[diesel(sql_type = BigInt)]
    pub deleted_comments_month: i64,
}

pub fn invalid_target(err: UnknownVariant) -> AppError {
    AppError::new(ErrorCode::BadRequest, err.to_string())
}
