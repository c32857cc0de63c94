pub mod action;
pub mod admin;
pub mod executor;
pub mod notices;
pub mod resolver;

pub use action::{Enforcement, ResolutionAction};
pub use admin::AdminActions;
pub use executor::ContentActionExecutor;
pub use resolver::{ReportResolver, ResolveOutcome};

/// The admin performing a moderation call, as recorded in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminActor {
    pub id: String,
    pub ip: Option<String>,
}

impl AdminActor {
    pub fn new(id: impl Into<String>, ip: Option<String>) -> Self {
        Self { id: id.into(), ip }
    }
}
