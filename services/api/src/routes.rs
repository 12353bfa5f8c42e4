use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Utc;
use realty_analytics::analysis::investment::{
    analyze, scenario_router, InvestmentMetrics, InvestmentRequest, MarketBenchmarks,
    ScenarioStore, YearProjectionView,
};
use realty_analytics::analysis::readiness::{
    CategoryId, RawInput, ReadinessEngine, SellerReadinessResult,
};
use realty_analytics::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Engines shared by the analysis endpoints.
#[derive(Clone)]
pub(crate) struct AnalysisContext {
    pub(crate) readiness: Arc<ReadinessEngine>,
    pub(crate) market: MarketBenchmarks,
}

#[derive(Debug, Serialize)]
pub(crate) struct InvestmentAnalysisResponse {
    pub(crate) metrics: InvestmentMetrics,
    pub(crate) years: Vec<YearProjectionView>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReadinessScoreRequest {
    pub(crate) answers: BTreeMap<CategoryId, RawInput>,
}

pub(crate) fn with_analysis_routes<S>(store: Arc<S>, context: AnalysisContext) -> Router
where
    S: ScenarioStore + 'static,
{
    scenario_router(store, context.market)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route(
            "/api/v1/investment/analysis",
            post(investment_analysis_endpoint),
        )
        .route("/api/v1/readiness/score", post(readiness_score_endpoint))
        .layer(Extension(context))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn investment_analysis_endpoint(
    Extension(context): Extension<AnalysisContext>,
    Json(payload): Json<InvestmentRequest>,
) -> Result<Json<InvestmentAnalysisResponse>, AppError> {
    let inputs = payload.resolve(&context.market);
    let report = analyze(&inputs)?;
    debug!(
        holding_period_years = inputs.holding_period_years,
        cap_rate = report.metrics.cap_rate,
        "investment analysis computed"
    );

    Ok(Json(InvestmentAnalysisResponse {
        years: report.year_views(),
        metrics: report.metrics,
    }))
}

pub(crate) async fn readiness_score_endpoint(
    Extension(context): Extension<AnalysisContext>,
    Json(payload): Json<ReadinessScoreRequest>,
) -> Result<Json<SellerReadinessResult>, AppError> {
    let result = context
        .readiness
        .compute_score_as_of(&payload.answers, Utc::now())?;
    debug!(
        overall_score = result.overall_score,
        grade = %result.grade,
        "readiness score computed"
    );

    Ok(Json(result))
}
