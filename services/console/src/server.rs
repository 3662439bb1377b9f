use crate::cli::ServeArgs;
use crate::infra::{AppState, DeskState};
use crate::routes::router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use hotel_desk::config::AppConfig;
use hotel_desk::error::AppError;
use hotel_desk::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));

    let mut desk = DeskState::open(&config);
    if desk.session.is_authenticated() {
        match desk.session.restore().await {
            Ok(user) => info!(username = %user.username, "restored previous session"),
            Err(err) => warn!(error = %err, "previous session discarded"),
        }
    }

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        desk: Arc::new(Mutex::new(desk)),
    };

    let app = router()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, api = %config.api.base_url, "hotel desk console ready");

    axum::serve(listener, app).await?;
    Ok(())
}
