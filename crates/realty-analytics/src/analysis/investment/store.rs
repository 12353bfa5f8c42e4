use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::report::InvestmentReport;
use super::scenarios::{SavedScenario, ScenarioBook, ScenarioError};

/// Identifies the browsing session that owns a scenario book.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to append one scenario to a session's book.
#[derive(Debug, Clone)]
pub struct ScenarioDraft {
    pub label: String,
    pub report: InvestmentReport,
    pub saved_at: DateTime<Utc>,
}

/// Session-keyed holder of scenario books so hosts can keep sessions isolated.
pub trait ScenarioStore: Send + Sync {
    fn save(
        &self,
        session: &SessionId,
        draft: ScenarioDraft,
    ) -> Result<SavedScenario, ScenarioStoreError>;

    /// Snapshot of the session's book; an unknown session yields an empty book.
    fn book(&self, session: &SessionId) -> Result<ScenarioBook, ScenarioStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ScenarioStoreError {
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error("scenario store unavailable: {0}")]
    Unavailable(String),
}
