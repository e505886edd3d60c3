use crate::cli::ServeArgs;
use crate::infra::{seed_catalog, AppState, InMemoryAdmissionsRepository, InMemoryNotificationOutbox};
use crate::routes::with_admissions_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use campus::config::AppConfig;
use campus::error::AppError;
use campus::telemetry;
use campus::workflows::admissions::AdmissionsService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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

    let repository = Arc::new(InMemoryAdmissionsRepository::default());
    seed_catalog(&repository, args.seats);
    let outbox = Arc::new(InMemoryNotificationOutbox::default());
    let admissions_service = Arc::new(AdmissionsService::new(repository, outbox));

    let app = with_admissions_routes(admissions_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "admissions service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
