use crate::cli::ServeArgs;
use crate::infra::{AppState, FileBackedMemberStore};
use crate::routes::with_roster_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use pab_roster::config::AppConfig;
use pab_roster::error::AppError;
use pab_roster::roster::{AccessGate, RosterService};
use pab_roster::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(FileBackedMemberStore::open(config.storage.data_path.clone())?);
    let roster_service = Arc::new(RosterService::new(store));

    let gate = AccessGate::from_config(&config.access);
    if gate.is_open() && config.environment.is_production() {
        warn!("APP_ACCESS_TOKEN not set, roster API accepts unauthenticated requests");
    }

    let app = with_roster_routes(roster_service, gate)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "pab roster service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
