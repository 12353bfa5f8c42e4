//! Rental property projection, summary metrics, and scenario comparison.

pub mod amortization;
mod domain;
pub mod export;
mod metrics;
mod projection;
mod report;
pub mod router;
mod scenarios;
pub mod store;

pub use amortization::{
    appreciate, AmortizationError, AmortizingLoan, AnnualLoanTotals, PeriodSplit,
};
pub use domain::{
    Constraint, DownPayment, InvestmentError, InvestmentInputs, InvestmentRequest,
    MarketBenchmarks, OperatingExpenses, MAX_YEARS,
};
pub use metrics::{compute_metrics, InvestmentMetrics};
pub use projection::{compute_projection, Projection, ProjectionIter, YearProjection};
pub use report::{analyze, InvestmentReport, YearProjectionView};
pub use router::scenario_router;
pub use scenarios::{
    SavedScenario, ScenarioBook, ScenarioComparison, ScenarioComparisonRow, ScenarioError,
    ScenarioId, ScenarioPolicy,
};
pub use store::{ScenarioDraft, ScenarioStore, ScenarioStoreError, SessionId};
