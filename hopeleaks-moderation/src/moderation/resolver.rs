use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use hopeleaks_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{NewAuditLog, ReportStatus};
use crate::moderation::action::ResolutionAction;
use crate::moderation::executor::ContentActionExecutor;
use crate::moderation::{notices, AdminActor};
use crate::notifications::{Dispatcher, NotificationSink};
use crate::store::{Gateway, ReportStore};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOutcome {
    pub report_id: i64,
    pub status: ReportStatus,
}

/// Resolves a report: content action, status write, then notices.
///
/// The content action and the status write share one transaction, and the
/// status write only applies while the report still has the status read at
/// the start. A concurrent resolution therefore makes this call fail with
/// `ReportAlreadyReviewed` and rolls back its content action. Re-resolving a
/// report that is already terminal is allowed and overwrites the reviewer.
///
/// Notices and the audit entry are dispatched after commit and never fail
/// the call.
#[derive(Clone)]
pub struct ReportResolver<G, N> {
    gateway: G,
    executor: ContentActionExecutor,
    dispatcher: Dispatcher<G, N>,
}

impl<G: Gateway, N: NotificationSink> ReportResolver<G, N> {
    pub fn new(gateway: G, executor: ContentActionExecutor, dispatcher: Dispatcher<G, N>) -> Self {
        Self {
            gateway,
            executor,
            dispatcher,
        }
    }

    pub async fn resolve(
        &self,
        report_id: i64,
        action: ResolutionAction,
        actor: &AdminActor,
    ) -> AppResult<ResolveOutcome> {
        let report = self
            .gateway
            .run(move |conn| conn.find_report(report_id))
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ReportNotFound, "report not found"))?;

        let observed = report.current_status()?;
        let status = action.target_status();
        let now = Utc::now();

        let executor = self.executor.clone();
        let admin_id = actor.id.clone();
        let snapshot = report.clone();
        let outcome = self
            .gateway
            .transaction(move |conn| {
                let outcome = executor.execute(conn, &snapshot, action, &admin_id, now)?;

                if !conn.update_report_status_if(snapshot.id, observed, status, &admin_id, now)? {
                    return Err(AppError::new(
                        ErrorCode::ReportAlreadyReviewed,
                        "report was reviewed by another moderator",
                    ));
                }

                Ok(outcome)
            })
            .await
            .inspect_err(|e| {
                if e.code() == ErrorCode::ReportAlreadyReviewed {
                    metrics::counter!("moderation_resolution_conflicts_total").increment(1);
                    tracing::warn!(report_id, admin_id = %actor.id, "report changed during resolution");
                }
            })?;

        self.dispatcher.audit(
            NewAuditLog::new(&actor.id, "resolve_report")
                .target("report", report_id)
                .details(json!({
                    "action": action.as_str(),
                    "status": status,
                    "previousStatus": observed,
                    "reportType": report.report_type,
                    "targetId": report.target_id,
                }))
                .ip(actor.ip.clone()),
        );

        if let Some(notice) = outcome.as_ref().and_then(|o| notices::for_outcome(&report, o)) {
            self.dispatcher.notify(notice);
        }
        self.dispatcher.notify(notices::report_update(&report, status));

        metrics::counter!("moderation_reports_resolved_total", "status" => status.as_str()).increment(1);
        tracing::info!(
            report_id,
            admin_id = %actor.id,
            action = %action,
            status = %status,
            content_actioned = outcome.is_some(),
            "report resolved"
        );

        Ok(ResolveOutcome { report_id, status })
    }
}
