use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;

use crate::notifications;
use crate::store::Gateway;
use crate::AppState;

pub mod admin_routes;
pub mod health;
pub mod notification_routes;
pub mod user_routes;

/// Full route tree. Cross-cutting layers are added by the caller.
pub fn router<G: Gateway>(state: Arc<AppState<G>>) -> Router {
    let admin = Router::new()
        .route("/reports", get(admin_routes::list_reports::<G>))
        .route(
            "/reports/:id",
            get(admin_routes::get_report::<G>).put(admin_routes::review_report::<G>),
        )
        .route("/reports/:id/resolve", post(admin_routes::resolve_report::<G>))
        .route("/moderation/reports", get(admin_routes::pending_reports::<G>))
        .route("/moderation/pending-scripts", get(admin_routes::pending_scripts::<G>))
        .route("/moderation/strikes", get(admin_routes::strike_overview::<G>))
        .route("/moderation/stats", get(admin_routes::moderation_stats::<G>))
        .route(
            "/users/:id/strikes",
            get(admin_routes::user_strikes::<G>).post(admin_routes::give_strike::<G>),
        )
        .route("/strikes/:id", delete(admin_routes::remove_strike::<G>))
        .route("/scripts/:id", delete(admin_routes::delete_script::<G>))
        .route("/comments/:id", delete(admin_routes::delete_comment::<G>))
        .route("/cleanup/strikes", post(admin_routes::cleanup_strikes::<G>))
        .route("/audit-logs", get(admin_routes::audit_logs::<G>));

    let notification = Router::new()
        .route("/", get(notification_routes::list_notifications::<G>))
        .route("/unread/count", get(notification_routes::unread_count::<G>))
        .route("/read-all", put(notification_routes::mark_all_read::<G>))
        .route("/:id/read", put(notification_routes::mark_read::<G>))
        .route("/:id", delete(notification_routes::delete_notification::<G>));

    let api = Router::new()
        .route("/reports", post(user_routes::create_report::<G>))
        .route("/users/:id/strikes", get(user_routes::user_strikes::<G>))
        .nest("/notifications", notification)
        .nest("/admin", admin);

    Router::new()
        .route("/health", get(health::health_check::<G>))
        .route("/metrics", get(health::metrics::<G>))
        .route("/ws", get(notifications::socket::ws_handler::<G>))
        .nest("/api", api)
        .with_state(state)
}
