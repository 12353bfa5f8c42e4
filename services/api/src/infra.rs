use metrics_exporter_prometheus::PrometheusHandle;
use realty_analytics::analysis::investment::{
    SavedScenario, ScenarioBook, ScenarioDraft, ScenarioPolicy, ScenarioStore,
    ScenarioStoreError, SessionId,
};
use realty_analytics::analysis::readiness::{CategoryId, RawInput};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local scenario books keyed by session. Nothing survives a restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryScenarioStore {
    policy: ScenarioPolicy,
    books: Arc<Mutex<HashMap<SessionId, ScenarioBook>>>,
}

impl InMemoryScenarioStore {
    pub(crate) fn new(policy: ScenarioPolicy) -> Self {
        Self {
            policy,
            books: Arc::default(),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, ScenarioBook>>, ScenarioStoreError> {
        self.books
            .lock()
            .map_err(|_| ScenarioStoreError::Unavailable("scenario store mutex poisoned".into()))
    }
}

impl ScenarioStore for InMemoryScenarioStore {
    fn save(
        &self,
        session: &SessionId,
        draft: ScenarioDraft,
    ) -> Result<SavedScenario, ScenarioStoreError> {
        let mut guard = self.lock()?;
        let book = guard
            .entry(session.clone())
            .or_insert_with(|| ScenarioBook::new(self.policy));
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
        let guard = self.lock()?;
        Ok(guard
            .get(session)
            .cloned()
            .unwrap_or_else(|| ScenarioBook::new(self.policy)))
    }
}

/// Parses `category=value` into a readiness answer. `true`/`false` become flags,
/// numbers become numeric answers, anything else is a choice.
pub(crate) fn parse_answer(raw: &str) -> Result<(CategoryId, RawInput), String> {
    let (category, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=VALUE, got '{raw}'"))?;
    let category = category.trim();
    let value = value.trim();
    if category.is_empty() {
        return Err(format!("missing category name in '{raw}'"));
    }
    if value.is_empty() {
        return Err(format!("missing value for category '{category}'"));
    }

    let input = if value.eq_ignore_ascii_case("true") {
        RawInput::Flag(true)
    } else if value.eq_ignore_ascii_case("false") {
        RawInput::Flag(false)
    } else if let Ok(number) = value.parse::<f64>() {
        if !number.is_finite() {
            return Err(format!("answer for '{category}' must be a finite number"));
        }
        RawInput::Number(number)
    } else {
        RawInput::Choice(value.to_string())
    };

    Ok((CategoryId::new(category), input))
}
