use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use hopeleaks_shared::errors::{AppError, AppResult, ErrorCode};
use hopeleaks_shared::types::api::ApiResponse;
use hopeleaks_shared::types::auth::AuthUser;

use crate::models::{invalid_target, NewReport, Report, ReportTarget, ReportType, Strike};
use crate::routes::admin_routes::StrikeHistoryParams;
use crate::store::{Gateway, ReportStore, StrikeStore};
use crate::AppState;

/// Script and comment ids arrive as numbers, user ids as strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawTargetId {
    Number(i64),
    Text(String),
}

impl RawTargetId {
    fn into_string(self) -> String {
        match self {
            RawTargetId::Number(id) => id.to_string(),
            RawTargetId::Text(id) => id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[serde(rename = "type")]
    pub report_type: String,
    #[serde(alias = "targetId")]
    pub target_id: RawTargetId,
    #[validate(length(min = 1, max = 100))]
    pub reason: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

impl CreateReportRequest {
    /// Checks everything the store relies on and builds the row.
    fn into_new_report(mut self, reporter_id: &str) -> AppResult<NewReport> {
        self.reason = self.reason.trim().to_string();
        self.validate()?;

        let kind: ReportType = self.report_type.parse().map_err(|_| {
            AppError::new(ErrorCode::InvalidReportType, "report type must be script, comment or user")
        })?;
        let target = ReportTarget::parse(kind, &self.target_id.into_string()).map_err(invalid_target)?;

        if target == ReportTarget::User(reporter_id.to_string()) {
            return Err(AppError::new(ErrorCode::CannotReportSelf, "you cannot report yourself"));
        }

        let description = self.description.filter(|d| !d.trim().is_empty());
        Ok(NewReport::new(reporter_id, &target, self.reason, description))
    }
}

pub async fn create_report<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    auth: AuthUser,
    Json(body): Json<CreateReportRequest>,
) -> AppResult<Json<ApiResponse<Report>>> {
    let new_report = body.into_new_report(&auth.id)?;
    let report = state.db.run(move |conn| conn.create_report(new_report)).await?;

    metrics::counter!("moderation_reports_created_total", "type" => report.report_type.clone()).increment(1);
    tracing::info!(
        report_id = report.id,
        reporter_id = %auth.id,
        report_type = %report.report_type,
        target_id = %report.target_id,
        "report submitted"
    );

    Ok(Json(ApiResponse::ok_with_message(report, "report submitted")))
}

/// A user's own strikes; admins may look at anyone's.
pub async fn user_strikes<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Query(params): Query<StrikeHistoryParams>,
) -> AppResult<Json<ApiResponse<Vec<Strike>>>> {
    if !auth.can_access(&user_id) {
        return Err(AppError::forbidden("access denied"));
    }

    let now = Utc::now();
    let strikes = state
        .db
        .run(move |conn| conn.strike_history(&user_id, params.active_only, now))
        .await?;

    Ok(Json(ApiResponse::ok(strikes)))
}
