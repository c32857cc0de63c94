use std::fmt;
use std::str::FromStr;

use hopeleaks_shared::errors::{AppError, ErrorCode};

use crate::models::ReportStatus;

/// What an admin decided to do with a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionAction {
    Dismiss,
    Enforce(Enforcement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// Delete reported content, strike reported users.
    Auto,
    DeleteContent,
    /// Strike the reported user, or the author of the reported content.
    StrikeUser,
}

impl ResolutionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionAction::Dismiss => "dismiss",
            ResolutionAction::Enforce(Enforcement::Auto) => "action",
            ResolutionAction::Enforce(Enforcement::DeleteContent) => "delete_content",
            ResolutionAction::Enforce(Enforcement::StrikeUser) => "strike_user",
        }
    }

    pub fn target_status(&self) -> ReportStatus {
        match self {
            ResolutionAction::Dismiss => ReportStatus::Dismissed,
            ResolutionAction::Enforce(_) => ReportStatus::Resolved,
        }
    }
}

impl FromStr for ResolutionAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dismiss" => Ok(ResolutionAction::Dismiss),
            "action" => Ok(ResolutionAction::Enforce(Enforcement::Auto)),
            "delete_content" => Ok(ResolutionAction::Enforce(Enforcement::DeleteContent)),
            "strike_user" => Ok(ResolutionAction::Enforce(Enforcement::StrikeUser)),
            other => Err(AppError::new(
                ErrorCode::InvalidAction,
                format!("unknown action '{other}', expected dismiss, action, delete_content or strike_user"),
            )),
        }
    }
}

impl fmt::Display for ResolutionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
