use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use hopeleaks_shared::errors::{AppError, AppResult, ErrorCode};
use hopeleaks_shared::middleware::{AdminUser, ClientIp};
use hopeleaks_shared::types::api::{Affected, ApiResponse};
use hopeleaks_shared::types::pagination::{Paginated, PaginationParams};

use crate::models::{
    AuditFilter, AuditLogEntry, ModerationStats, PendingReport, PendingScript, Report, ReportListing, ReportStatus,
    Strike, StrikeSummary,
};
use crate::moderation::admin::direct_strike_expiry;
use crate::moderation::{AdminActor, ResolutionAction, ResolveOutcome};
use crate::store::{AuditStore, ContentStore, Gateway, ReportStore, StrikeStore};
use crate::AppState;

// --- Request types ---

#[derive(Debug, Deserialize)]
pub struct ReportFilterParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuditLogParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub admin_id: Option<String>,
    pub action: Option<String>,
}

fn default_page() -> u64 { 1 }
fn default_per_page() -> u64 { 20 }

#[derive(Debug, Deserialize)]
pub struct ReviewReportRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ResolveReportRequest {
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct StrikeHistoryParams {
    #[serde(default, alias = "activeOnly")]
    pub active_only: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GiveStrikeRequest {
    #[validate(length(min = 1, max = 255))]
    pub reason: String,
    /// Omitted: 30 days. 0: permanent.
    #[serde(alias = "expiresInDays")]
    #[validate(range(max = 36500))]
    pub expires_in_days: Option<u32>,
}

fn parse_status(raw: &str) -> AppResult<ReportStatus> {
    raw.parse()
        .map_err(|_| AppError::new(ErrorCode::InvalidReportStatus, format!("unknown report status '{raw}'")))
}

fn actor(admin: &AdminUser, ip: ClientIp) -> AdminActor {
    AdminActor::new(&admin.0.id, ip.0)
}

// --- Reports ---

pub async fn list_reports<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    _admin: AdminUser,
    Query(params): Query<ReportFilterParams>,
) -> AppResult<Json<ApiResponse<Paginated<ReportListing>>>> {
    let status = params.status.as_deref().map(parse_status).transpose()?;
    let pagination = PaginationParams::new(params.page, params.per_page);
    let (limit, offset) = (pagination.limit(), pagination.offset());

    let (items, total) = state
        .db
        .run(move |conn| {
            let items = conn.list_reports(status, limit, offset)?;
            let total = conn.count_reports(status)?;
            Ok((items, total))
        })
        .await?;

    Ok(Json(ApiResponse::ok(Paginated::new(items, total, &pagination))))
}

pub async fn get_report<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    _admin: AdminUser,
    Path(report_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Report>>> {
    let report = state
        .db
        .run(move |conn| conn.find_report(report_id))
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReportNotFound, "report not found"))?;

    Ok(Json(ApiResponse::ok(report)))
}

/// Manual status correction; no content action, no notices.
pub async fn review_report<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    admin: AdminUser,
    ip: ClientIp,
    Path(report_id): Path<i64>,
    Json(body): Json<ReviewReportRequest>,
) -> AppResult<Json<ApiResponse<ResolveOutcome>>> {
    let status = parse_status(&body.status)?;
    state.admin.review_report(report_id, status, &actor(&admin, ip)).await?;

    Ok(Json(ApiResponse::ok_with_message(
        ResolveOutcome { report_id, status },
        "report updated",
    )))
}

pub async fn resolve_report<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    admin: AdminUser,
    ip: ClientIp,
    Path(report_id): Path<i64>,
    Json(body): Json<ResolveReportRequest>,
) -> AppResult<Json<ApiResponse<ResolveOutcome>>> {
    let action: ResolutionAction = body.action.parse()?;
    let outcome = state.resolver.resolve(report_id, action, &actor(&admin, ip)).await?;

    Ok(Json(ApiResponse::ok_with_message(outcome, "report resolved")))
}

// --- Moderation dashboard ---

pub async fn pending_reports<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<Vec<PendingReport>>>> {
    let reports = state.db.run(|conn| conn.pending_reports()).await?;
    Ok(Json(ApiResponse::ok(reports)))
}

pub async fn pending_scripts<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<Vec<PendingScript>>>> {
    let scripts = state.db.run(|conn| conn.pending_scripts()).await?;
    Ok(Json(ApiResponse::ok(scripts)))
}

pub async fn strike_overview<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<Vec<StrikeSummary>>>> {
    let now = Utc::now();
    let overview = state.db.run(move |conn| conn.strike_overview(now)).await?;
    Ok(Json(ApiResponse::ok(overview)))
}

pub async fn moderation_stats<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<ModerationStats>>> {
    let now = Utc::now();
    let stats = state.db.run(move |conn| conn.moderation_stats(now)).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

// --- Strikes ---

pub async fn user_strikes<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    _admin: AdminUser,
    Path(user_id): Path<String>,
    Query(params): Query<StrikeHistoryParams>,
) -> AppResult<Json<ApiResponse<Vec<Strike>>>> {
    let now = Utc::now();
    let strikes = state
        .db
        .run(move |conn| conn.strike_history(&user_id, params.active_only, now))
        .await?;

    Ok(Json(ApiResponse::ok(strikes)))
}

pub async fn give_strike<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    admin: AdminUser,
    ip: ClientIp,
    Path(user_id): Path<String>,
    Json(mut body): Json<GiveStrikeRequest>,
) -> AppResult<Json<ApiResponse<Strike>>> {
    body.reason = body.reason.trim().to_string();
    body.validate()?;

    let strike = state
        .admin
        .give_strike(&user_id, &body.reason, direct_strike_expiry(body.expires_in_days), &actor(&admin, ip))
        .await?;

    Ok(Json(ApiResponse::ok_with_message(strike, "strike added")))
}

pub async fn remove_strike<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    admin: AdminUser,
    ip: ClientIp,
    Path(strike_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Strike>>> {
    let strike = state.admin.remove_strike(strike_id, &actor(&admin, ip)).await?;
    Ok(Json(ApiResponse::ok_with_message(strike, "strike removed")))
}

pub async fn cleanup_strikes<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    admin: AdminUser,
    ip: ClientIp,
) -> AppResult<Json<ApiResponse<Affected>>> {
    let cleaned = state.admin.cleanup_strikes(&actor(&admin, ip)).await?;
    Ok(Json(ApiResponse::ok_with_message(
        Affected::new(cleaned),
        format!("cleaned up {cleaned} expired strikes"),
    )))
}

// --- Content ---

pub async fn delete_script<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    admin: AdminUser,
    ip: ClientIp,
    Path(script_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    state.admin.delete_script(script_id, &actor(&admin, ip)).await?;
    Ok(Json(ApiResponse::ok_with_message(Affected::new(1u64), "script deleted")))
}

pub async fn delete_comment<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    admin: AdminUser,
    ip: ClientIp,
    Path(comment_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    state.admin.delete_comment(comment_id, &actor(&admin, ip)).await?;
    Ok(Json(ApiResponse::ok_with_message(Affected::new(1u64), "comment deleted")))
}

// --- Audit log ---

pub async fn audit_logs<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    _admin: AdminUser,
    Query(params): Query<AuditLogParams>,
) -> AppResult<Json<ApiResponse<Paginated<AuditLogEntry>>>> {
    let pagination = PaginationParams::new(params.page, params.per_page);
    let (limit, offset) = (pagination.limit(), pagination.offset());
    let filter = AuditFilter {
        admin_id: params.admin_id,
        action: params.action,
    };

    let (items, total) = state
        .db
        .run(move |conn| conn.audit_logs(&filter, limit, offset))
        .await?;

    Ok(Json(ApiResponse::ok(Paginated::new(items, total, &pagination))))
}
