use serde::Serialize;

use super::domain::{InvestmentError, InvestmentInputs};
use super::metrics::{compute_metrics, InvestmentMetrics};
use super::projection::{compute_projection, YearProjection};

/// Flattened projection row for charts, tables, and exports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearProjectionView {
    pub year: u32,
    pub property_value: f64,
    pub loan_balance: f64,
    pub equity: f64,
    pub net_operating_income: f64,
    pub debt_service: f64,
    pub net_cash_flow: f64,
    pub cumulative_cash_flow: f64,
}

impl YearProjection {
    pub fn to_view(&self) -> YearProjectionView {
        YearProjectionView {
            year: self.year,
            property_value: self.property_value,
            loan_balance: self.loan_balance,
            equity: self.equity(),
            net_operating_income: self.net_operating_income,
            debt_service: self.debt_service,
            net_cash_flow: self.net_cash_flow,
            cumulative_cash_flow: self.cumulative_cash_flow,
        }
    }
}

/// Complete analysis result handed to presentation and export collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentReport {
    pub inputs: InvestmentInputs,
    pub metrics: InvestmentMetrics,
    pub years: Vec<YearProjection>,
}

impl InvestmentReport {
    pub fn year_views(&self) -> Vec<YearProjectionView> {
        self.years.iter().map(YearProjection::to_view).collect()
    }
}

/// Runs projection then metrics over the same materialized years.
pub fn analyze(inputs: &InvestmentInputs) -> Result<InvestmentReport, InvestmentError> {
    let years = compute_projection(inputs)?.collect_years();
    let metrics = compute_metrics(inputs, &years)?;

    Ok(InvestmentReport {
        inputs: inputs.clone(),
        metrics,
        years,
    })
}
