use crate::cli::ServeArgs;
use crate::infra::{schema_registry, AppState};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use maag_assessment::config::AppConfig;
use maag_assessment::error::AppError;
use maag_assessment::telemetry;
use maag_assessment::workflows::assessment::{
    AdviceCatalog, AssessmentService, InMemorySubmissionRepository, RiskScoringEngine,
};
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

    let registry = Arc::new(schema_registry(&config.questionnaire)?);
    let engine = Arc::new(RiskScoringEngine::new(AdviceCatalog::builtin()?));
    let repository = Arc::new(InMemorySubmissionRepository::default());
    let schema = registry.current();
    let assessment_service = Arc::new(
        AssessmentService::new(registry, engine, repository)
            .with_page_size(config.questionnaire.page_size),
    );

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        sections = schema.len(),
        questions = schema.question_count(),
        "maag assessment service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
