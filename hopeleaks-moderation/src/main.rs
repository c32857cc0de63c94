use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod background;
mod config;
mod models;
mod moderation;
mod notifications;
mod routes;
mod schema;
mod store;
mod telemetry;

use config::AppConfig;
use moderation::{AdminActions, ContentActionExecutor, ReportResolver};
use notifications::{ConnectionHub, Dispatcher, LiveNotifier};
use store::{Gateway, PgGateway};

pub struct AppState<G: Gateway = PgGateway> {
    pub db: G,
    pub config: AppConfig,
    pub resolver: ReportResolver<G, LiveNotifier<G>>,
    pub admin: AdminActions<G, LiveNotifier<G>>,
    pub hub: Arc<ConnectionHub>,
    pub metrics: PrometheusHandle,
}

impl<G: Gateway> AppState<G> {
    /// Wires the moderation services over one gateway. The dispatcher is
    /// handed back so shutdown can drain it.
    pub fn new(db: G, config: AppConfig, metrics: PrometheusHandle) -> (Self, Dispatcher<G, LiveNotifier<G>>) {
        let hub = Arc::new(ConnectionHub::new());
        let dispatcher = Dispatcher::new(db.clone(), LiveNotifier::new(db.clone(), hub.clone()));
        let executor = ContentActionExecutor::new(config.resolution_strike_expiry());
        let state = Self {
            resolver: ReportResolver::new(db.clone(), executor, dispatcher.clone()),
            admin: AdminActions::new(db.clone(), dispatcher.clone()),
            db,
            config,
            hub,
            metrics,
        };
        (state, dispatcher)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hopeleaks_shared::middleware::init_tracing("hopeleaks-moderation");
    let metrics = hopeleaks_shared::middleware::init_metrics()?;
    telemetry::describe_metrics();

    let config = AppConfig::load()?;
    let port = config.port;

    // Extractors read the secret from the environment.
    std::env::set_var("JWT_SECRET", &config.jwt_secret);

    let pool = hopeleaks_shared::clients::db::create_pool(&config.database_url, config.db_pool_size)?;
    let (state, dispatcher) = AppState::new(PgGateway::new(pool), config, metrics);
    let hub = state.hub.clone();

    let cancel = CancellationToken::new();
    let jobs = vec![
        tokio::spawn(background::strike_sweep::run(
            state.db.clone(),
            Duration::from_secs(state.config.strike_sweep_interval_secs),
            cancel.clone(),
        )),
        tokio::spawn(background::notification_retention::run(
            state.db.clone(),
            state.config.notification_retention_days,
            Duration::from_secs(state.config.notification_cleanup_interval_secs),
            cancel.clone(),
        )),
        tokio::spawn(background::heartbeat::run(hub.clone(), cancel.clone())),
    ];

    let app = routes::router(Arc::new(state))
        .layer(axum::middleware::from_fn(hopeleaks_shared::middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "hopeleaks-moderation starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped accepting connections, cleaning up");

    cancel.cancel();
    for job in jobs {
        let _ = tokio::time::timeout(Duration::from_secs(5), job).await;
    }

    tracing::info!(pending = dispatcher.pending(), "draining notification tasks");
    if tokio::time::timeout(Duration::from_secs(10), dispatcher.drain()).await.is_err() {
        tracing::warn!(pending = dispatcher.pending(), "gave up waiting for notification tasks");
    }

    hub.shutdown_all().await;
    tracing::info!("graceful shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received ctrl-c, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
