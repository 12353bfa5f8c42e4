use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::InvestmentInputs;
use super::metrics::InvestmentMetrics;
use super::projection::YearProjection;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub String);

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller-configurable save rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioPolicy {
    pub reject_duplicate_names: bool,
}

impl Default for ScenarioPolicy {
    fn default() -> Self {
        Self {
            reject_duplicate_names: true,
        }
    }
}

/// Named, timestamped snapshot of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedScenario {
    id: ScenarioId,
    label: String,
    saved_at: DateTime<Utc>,
    inputs: InvestmentInputs,
    metrics: InvestmentMetrics,
    projection: Vec<YearProjection>,
}

impl SavedScenario {
    pub fn id(&self) -> &ScenarioId {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn saved_at(&self) -> DateTime<Utc> {
        self.saved_at
    }

    pub fn inputs(&self) -> &InvestmentInputs {
        &self.inputs
    }

    pub fn metrics(&self) -> &InvestmentMetrics {
        &self.metrics
    }

    pub fn projection(&self) -> &[YearProjection] {
        &self.projection
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    #[error("scenario name must not be empty")]
    EmptyName,
    #[error("a scenario named '{label}' already exists")]
    DuplicateName { label: String },
}

/// Ordered scenario collection owned by the caller (a session, a test, a CLI run).
#[derive(Debug, Clone, Default)]
pub struct ScenarioBook {
    policy: ScenarioPolicy,
    scenarios: Vec<SavedScenario>,
    sequence: u64,
}

impl ScenarioBook {
    pub fn new(policy: ScenarioPolicy) -> Self {
        Self {
            policy,
            scenarios: Vec::new(),
            sequence: 0,
        }
    }

    pub fn policy(&self) -> ScenarioPolicy {
        self.policy
    }

    /// Appends a new immutable scenario, preserving insertion order.
    pub fn save(
        &mut self,
        label: impl Into<String>,
        inputs: InvestmentInputs,
        metrics: InvestmentMetrics,
        projection: Vec<YearProjection>,
        saved_at: DateTime<Utc>,
    ) -> Result<&SavedScenario, ScenarioError> {
        let label = label.into().trim().to_string();
        if label.is_empty() {
            return Err(ScenarioError::EmptyName);
        }

        if self.policy.reject_duplicate_names
            && self
                .scenarios
                .iter()
                .any(|scenario| scenario.label.eq_ignore_ascii_case(&label))
        {
            return Err(ScenarioError::DuplicateName { label });
        }

        self.sequence += 1;
        let index = self.scenarios.len();
        self.scenarios.push(SavedScenario {
            id: ScenarioId(format!("scenario-{:06}", self.sequence)),
            label,
            saved_at,
            inputs,
            metrics,
            projection,
        });

        Ok(&self.scenarios[index])
    }

    pub fn get(&self, id: &ScenarioId) -> Option<&SavedScenario> {
        self.scenarios.iter().find(|scenario| &scenario.id == id)
    }

    pub fn remove(&mut self, id: &ScenarioId) -> Option<SavedScenario> {
        let position = self.scenarios.iter().position(|scenario| &scenario.id == id)?;
        Some(self.scenarios.remove(position))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SavedScenario> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Side-by-side view of every saved scenario in insertion order.
    pub fn compare(&self) -> ScenarioComparison {
        let rows: Vec<ScenarioComparisonRow> = self
            .scenarios
            .iter()
            .map(ScenarioComparisonRow::from_scenario)
            .collect();

        let best_cap_rate = best_by(&rows, |row| Some(row.cap_rate));
        let best_cash_on_cash = best_by(&rows, |row| row.cash_on_cash_return);
        let best_total_return = best_by(&rows, |row| row.total_return);

        ScenarioComparison {
            rows,
            best_cap_rate,
            best_cash_on_cash,
            best_total_return,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioComparisonRow {
    pub id: ScenarioId,
    pub label: String,
    pub saved_at: DateTime<Utc>,
    pub purchase_price: f64,
    pub initial_cash_invested: f64,
    pub cap_rate: f64,
    pub cash_on_cash_return: Option<f64>,
    pub total_return: Option<f64>,
    pub final_equity: f64,
    pub cumulative_cash_flow: f64,
}

impl ScenarioComparisonRow {
    fn from_scenario(scenario: &SavedScenario) -> Self {
        Self {
            id: scenario.id.clone(),
            label: scenario.label.clone(),
            saved_at: scenario.saved_at,
            purchase_price: scenario.inputs.purchase_price,
            initial_cash_invested: scenario.metrics.initial_cash_invested,
            cap_rate: scenario.metrics.cap_rate,
            cash_on_cash_return: scenario.metrics.cash_on_cash_return,
            total_return: scenario.metrics.total_return,
            final_equity: scenario.metrics.final_equity,
            cumulative_cash_flow: scenario.metrics.cumulative_cash_flow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioComparison {
    pub rows: Vec<ScenarioComparisonRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_cap_rate: Option<ScenarioId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_cash_on_cash: Option<ScenarioId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_total_return: Option<ScenarioId>,
}

// Ties keep the earliest scenario.
fn best_by<F>(rows: &[ScenarioComparisonRow], metric: F) -> Option<ScenarioId>
where
    F: Fn(&ScenarioComparisonRow) -> Option<f64>,
{
    let mut best: Option<(&ScenarioComparisonRow, f64)> = None;
    for row in rows {
        let Some(value) = metric(row) else { continue };
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((row, value)),
        }
    }
    best.map(|(row, _)| row.id.clone())
}
