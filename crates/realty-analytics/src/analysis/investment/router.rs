use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{InvestmentRequest, MarketBenchmarks};
use super::report::analyze;
use super::scenarios::{SavedScenario, ScenarioComparison};
use super::store::{ScenarioDraft, ScenarioStore, SessionId};
use crate::error::AppError;

struct ScenarioRoutes<S> {
    store: Arc<S>,
    benchmarks: MarketBenchmarks,
}

impl<S> Clone for ScenarioRoutes<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            benchmarks: self.benchmarks,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaveScenarioRequest {
    pub label: String,
    pub inputs: InvestmentRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioListResponse {
    pub session_id: SessionId,
    pub scenarios: Vec<SavedScenario>,
    pub comparison: ScenarioComparison,
}

/// Router exposing per-session scenario save and comparison endpoints.
pub fn scenario_router<S>(store: Arc<S>, benchmarks: MarketBenchmarks) -> Router
where
    S: ScenarioStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/investment/sessions/:session_id/scenarios",
            post(save_handler::<S>).get(list_handler::<S>),
        )
        .with_state(ScenarioRoutes { store, benchmarks })
}

async fn save_handler<S>(
    State(routes): State<ScenarioRoutes<S>>,
    Path(session_id): Path<String>,
    Json(request): Json<SaveScenarioRequest>,
) -> Result<(StatusCode, Json<SavedScenario>), AppError>
where
    S: ScenarioStore + 'static,
{
    let inputs = request.inputs.resolve(&routes.benchmarks);
    let report = analyze(&inputs)?;
    let draft = ScenarioDraft {
        label: request.label,
        report,
        saved_at: Utc::now(),
    };

    let scenario = routes.store.save(&SessionId(session_id), draft)?;
    Ok((StatusCode::CREATED, Json(scenario)))
}

async fn list_handler<S>(
    State(routes): State<ScenarioRoutes<S>>,
    Path(session_id): Path<String>,
) -> Result<Json<ScenarioListResponse>, AppError>
where
    S: ScenarioStore + 'static,
{
    let session_id = SessionId(session_id);
    let book = routes.store.book(&session_id)?;

    Ok(Json(ScenarioListResponse {
        comparison: book.compare(),
        scenarios: book.iter().cloned().collect(),
        session_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::investment::scenarios::{ScenarioBook, ScenarioPolicy};
    use crate::analysis::investment::store::ScenarioStoreError;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct TestStore {
        books: Mutex<HashMap<SessionId, ScenarioBook>>,
    }

    impl ScenarioStore for TestStore {
        fn save(
            &self,
            session: &SessionId,
            draft: ScenarioDraft,
        ) -> Result<SavedScenario, ScenarioStoreError> {
            let mut guard = self.books.lock().expect("store mutex poisoned");
            let book = guard
                .entry(session.clone())
                .or_insert_with(|| ScenarioBook::new(ScenarioPolicy::default()));
            let saved = book.save(
                draft.label,
                draft.report.inputs,
                draft.report.metrics,
                draft.report.years,
                draft.saved_at,
            )?;
            Ok(saved.clone())
        }

        fn book(&self, session: &SessionId) -> Result<ScenarioBook, ScenarioStoreError> {
            let guard = self.books.lock().expect("store mutex poisoned");
            Ok(guard.get(session).cloned().unwrap_or_default())
        }
    }

    fn payload(label: &str, down_payment: Value) -> String {
        json!({
            "label": label,
            "inputs": {
                "purchase_price": 250000,
                "down_payment": down_payment,
                "annual_interest_rate": 0.07,
                "loan_term_years": 30,
                "monthly_rent": 2000,
                "operating_expenses": { "kind": "monthly", "amount": 600 },
                "holding_period_years": 5
            }
        })
        .to_string()
    }

    fn post(session: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/investment/sessions/{session}/scenarios"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("request builds")
    }

    fn get(session: &str) -> Request<Body> {
        Request::builder()
            .uri(format!("/api/v1/investment/sessions/{session}/scenarios"))
            .body(Body::empty())
            .expect("request builds")
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn saves_and_lists_scenarios_per_session() {
        let store = Arc::new(TestStore::default());
        let router = scenario_router(store, MarketBenchmarks::default());

        let response = router
            .clone()
            .oneshot(post("s1", payload("Twenty down", json!({ "kind": "percent", "value": 0.2 }))))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let saved = json_body(response).await;
        assert_eq!(saved["id"], "scenario-000001");
        assert_eq!(saved["inputs"]["vacancy_rate"], 0.05);

        router
            .clone()
            .oneshot(post("s1", payload("Thirty down", json!({ "kind": "percent", "value": 0.3 }))))
            .await
            .expect("response");

        let listing = json_body(router.clone().oneshot(get("s1")).await.expect("response")).await;
        let labels: Vec<_> = listing["scenarios"]
            .as_array()
            .expect("array")
            .iter()
            .map(|scenario| scenario["label"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(labels, vec!["Twenty down", "Thirty down"]);
        assert_eq!(listing["comparison"]["rows"].as_array().map(Vec::len), Some(2));

        let other = json_body(router.oneshot(get("s2")).await.expect("response")).await;
        assert_eq!(other["scenarios"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn duplicate_label_conflicts() {
        let router = scenario_router(Arc::new(TestStore::default()), MarketBenchmarks::default());
        let down = json!({ "kind": "percent", "value": 0.2 });

        router
            .clone()
            .oneshot(post("s1", payload("Baseline", down.clone())))
            .await
            .expect("response");
        let response = router
            .oneshot(post("s1", payload("Baseline", down)))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn invalid_inputs_report_the_field() {
        let router = scenario_router(Arc::new(TestStore::default()), MarketBenchmarks::default());
        let response = router
            .oneshot(post(
                "s1",
                payload("Too much down", json!({ "kind": "amount", "value": 300000 })),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["field"], "down_payment");
        assert_eq!(body["constraint"], "at_most_purchase_price");
    }
}
