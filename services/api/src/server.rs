use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryEmployeeDirectory, InMemoryVerificationRepository};
use crate::routes::with_verification_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fnf_verify::config::AppConfig;
use fnf_verify::error::AppError;
use fnf_verify::telemetry;
use fnf_verify::verification::{EmployeeRosterImporter, VerificationService};
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
    if let Some(roster) = args.roster.take() {
        config.roster_path = Some(roster);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let directory = Arc::new(InMemoryEmployeeDirectory::default());
    match &config.roster_path {
        Some(path) => {
            let records = EmployeeRosterImporter::from_path(path)?;
            let seeded = EmployeeRosterImporter::seed(directory.as_ref(), records)?;
            info!(seeded, roster = %path.display(), "employee directory seeded");
        }
        None => warn!("no roster configured; employee directory starts empty"),
    }

    let repository = Arc::new(InMemoryVerificationRepository::default());
    let verification_service = Arc::new(VerificationService::new(
        directory,
        repository,
        config.verification,
    ));

    let app = with_verification_routes(verification_service, config.environment)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "f&f verification portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}
