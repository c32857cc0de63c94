use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use hopeleaks_shared::errors::{AppError, AppResult, ErrorCode};
use hopeleaks_shared::types::api::{Affected, ApiResponse};
use hopeleaks_shared::types::auth::AuthUser;
use hopeleaks_shared::types::pagination::{Paginated, PaginationParams};

use crate::models::Notification;
use crate::store::{Gateway, NotificationStore};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NotificationListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    #[serde(default)]
    pub unread: bool,
}

fn default_page() -> u64 { 1 }
fn default_per_page() -> u64 { 20 }

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::NotificationNotFound, "notification not found")
}

pub async fn list_notifications<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    auth: AuthUser,
    Query(params): Query<NotificationListParams>,
) -> AppResult<Json<ApiResponse<Paginated<Notification>>>> {
    let pagination = PaginationParams::new(params.page, params.per_page);
    let (limit, offset) = (pagination.limit(), pagination.offset());
    let unread_only = params.unread;

    let (items, total) = state
        .db
        .run(move |conn| conn.list_notifications(&auth.id, unread_only, limit, offset))
        .await?;

    Ok(Json(ApiResponse::ok(Paginated::new(items, total, &pagination))))
}

pub async fn unread_count<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<UnreadCount>>> {
    let count = state.db.run(move |conn| conn.count_unread(&auth.id)).await?;
    Ok(Json(ApiResponse::ok(UnreadCount { count })))
}

pub async fn mark_read<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    auth: AuthUser,
    Path(notification_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    let changed = state
        .db
        .run(move |conn| conn.mark_read(notification_id, &auth.id))
        .await?;

    if !changed {
        return Err(not_found());
    }
    Ok(Json(ApiResponse::ok(Affected::new(1u64))))
}

pub async fn mark_all_read<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    auth: AuthUser,
) -> AppResult<Json<ApiResponse<Affected>>> {
    let updated = state.db.run(move |conn| conn.mark_all_read(&auth.id)).await?;
    Ok(Json(ApiResponse::ok(Affected::new(updated))))
}

pub async fn delete_notification<G: Gateway>(
    State(state): State<Arc<AppState<G>>>,
    auth: AuthUser,
    Path(notification_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    let deleted = state
        .db
        .run(move |conn| conn.delete_notification(notification_id, &auth.id))
        .await?;

    if !deleted {
        return Err(not_found());
    }
    Ok(Json(ApiResponse::ok(Affected::new(1u64))))
}
