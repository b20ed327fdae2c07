use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryObligationRepository, InMemoryTenantDirectory, OfflineInsightGateway,
    RecordingDigestSender,
};
use crate::routes::with_compliance_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use compliance_track::compliance::insights::{InsightRoutes, InsightService};
use compliance_track::compliance::notifications::{DeadlineDigestService, DigestOptions};
use compliance_track::compliance::obligations::{ObligationRoutes, ObligationService};
use compliance_track::config::AppConfig;
use compliance_track::error::AppError;
use compliance_track::telemetry;
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

    let repository = Arc::new(InMemoryObligationRepository::default());
    let directory = Arc::new(InMemoryTenantDirectory::default());
    let obligation_service = Arc::new(ObligationService::new(repository.clone()));
    let insight_service = Arc::new(InsightService::new(
        Arc::new(OfflineInsightGateway),
        config.insights.requests_per_minute,
    ));
    let digest_service = Arc::new(DeadlineDigestService::new(
        repository.clone(),
        directory.clone(),
        Arc::new(RecordingDigestSender::default()),
        DigestOptions {
            from_address: config.notifications.from_address.clone(),
            dashboard_url: config.notifications.dashboard_url.clone(),
        },
    ));

    let app = with_compliance_routes(
        ObligationRoutes {
            service: obligation_service,
            directory: directory.clone(),
        },
        InsightRoutes {
            service: insight_service,
            repository,
            directory,
        },
        digest_service,
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "compliance obligation tracker ready");

    axum::serve(listener, app).await?;
    Ok(())
}
