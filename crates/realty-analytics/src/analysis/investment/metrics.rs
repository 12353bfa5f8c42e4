use serde::{Deserialize, Serialize};

use super::domain::{Constraint, InvestmentError, InvestmentInputs};
use super::projection::YearProjection;

/// Summary figures derived once per calculation.
///
/// Ratio metrics that would divide by zero are `None` rather than infinite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentMetrics {
    pub initial_cash_invested: f64,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub first_year_noi: f64,
    pub first_year_cash_flow: f64,
    pub cap_rate: f64,
    pub cash_on_cash_return: Option<f64>,
    pub debt_service_coverage: Option<f64>,
    pub gross_rent_multiplier: Option<f64>,
    pub final_year: u32,
    pub final_equity: f64,
    pub equity_growth: f64,
    pub cumulative_cash_flow: f64,
    pub total_return: Option<f64>,
    pub annualized_return: Option<f64>,
}

/// Derives metrics from the inputs and an already computed projection.
///
/// Loan figures are read from the projection entries so the summary can never
/// disagree with the year-by-year table it accompanies.
pub fn compute_metrics(
    inputs: &InvestmentInputs,
    projection: &[YearProjection],
) -> Result<InvestmentMetrics, InvestmentError> {
    inputs.validate()?;

    let (first, last) = match (projection.first(), projection.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(InvestmentError::invalid("projection", Constraint::NonEmpty)),
    };

    let initial_cash_invested = inputs.initial_cash_invested();
    let down_payment = inputs.down_payment_amount();

    let cash_on_cash_return = ratio(first.net_cash_flow, initial_cash_invested);
    let debt_service_coverage = ratio(first.net_operating_income, first.debt_service);
    let gross_rent_multiplier = ratio(inputs.purchase_price, first.gross_rent);

    let final_equity = last.equity();
    let equity_growth = final_equity - down_payment;
    let total_return = ratio(
        equity_growth + last.cumulative_cash_flow,
        initial_cash_invested,
    );
    let annualized_return = total_return.and_then(|total| {
        let growth = 1.0 + total;
        if growth > 0.0 && last.year > 0 {
            Some(growth.powf(1.0 / f64::from(last.year)) - 1.0)
        } else {
            None
        }
    });

    Ok(InvestmentMetrics {
        initial_cash_invested,
        loan_amount: inputs.loan_amount(),
        monthly_payment: first.debt_service / 12.0,
        first_year_noi: first.net_operating_income,
        first_year_cash_flow: first.net_cash_flow,
        cap_rate: first.net_operating_income / inputs.purchase_price,
        cash_on_cash_return,
        debt_service_coverage,
        gross_rent_multiplier,
        final_year: last.year,
        final_equity,
        equity_growth,
        cumulative_cash_flow: last.cumulative_cash_flow,
        total_return,
        annualized_return,
    })
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        None
    }
}
