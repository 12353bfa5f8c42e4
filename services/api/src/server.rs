use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryScenarioStore};
use crate::routes::{with_analysis_routes, AnalysisContext};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use realty_analytics::analysis::readiness::ReadinessEngine;
use realty_analytics::config::AppConfig;
use realty_analytics::error::AppError;
use realty_analytics::telemetry;
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

    let rubric = config.readiness.load()?;
    let engine = Arc::new(ReadinessEngine::new(rubric)?);
    info!(
        categories = engine.config().categories.len(),
        source = ?config.readiness,
        "readiness rubric loaded"
    );

    let scenarios = Arc::new(InMemoryScenarioStore::new(config.scenarios));
    let context = AnalysisContext {
        readiness: engine,
        market: config.market,
    };

    let app = with_analysis_routes(scenarios, context)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "realty analytics service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
