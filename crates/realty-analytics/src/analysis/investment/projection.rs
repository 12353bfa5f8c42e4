use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

use super::amortization::{appreciate, AmortizingLoan, AnnualLoanTotals, MONTHS_PER_YEAR};
use super::domain::{InvestmentError, InvestmentInputs};

/// One projected year of ownership. Equity is derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    pub year: u32,
    pub property_value: f64,
    pub loan_balance: f64,
    pub gross_rent: f64,
    pub vacancy_loss: f64,
    pub operating_expenses: f64,
    pub net_operating_income: f64,
    pub debt_service: f64,
    pub interest_paid: f64,
    pub principal_paid: f64,
    pub net_cash_flow: f64,
    pub cumulative_cash_flow: f64,
}

impl YearProjection {
    pub fn equity(&self) -> f64 {
        self.property_value - self.loan_balance
    }
}

/// Validated, lazily evaluated projection over the holding period.
///
/// Every call to [`Projection::iter`] starts a fresh pass from year 1, so the
/// sequence can be replayed without carrying state between passes.
#[derive(Debug, Clone)]
pub struct Projection {
    inputs: InvestmentInputs,
    loan: Option<AmortizingLoan>,
}

/// Validates `inputs` and prepares the year-by-year projection.
pub fn compute_projection(inputs: &InvestmentInputs) -> Result<Projection, InvestmentError> {
    inputs.validate()?;

    let principal = inputs.loan_amount();
    let loan = if principal > 0.0 {
        Some(AmortizingLoan::new(
            principal,
            inputs.annual_interest_rate,
            inputs.loan_term_years,
        )?)
    } else {
        None
    };

    Ok(Projection {
        inputs: inputs.clone(),
        loan,
    })
}

impl Projection {
    pub fn inputs(&self) -> &InvestmentInputs {
        &self.inputs
    }

    pub fn loan(&self) -> Option<&AmortizingLoan> {
        self.loan.as_ref()
    }

    pub fn len(&self) -> usize {
        self.inputs.holding_period_years as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> ProjectionIter<'_> {
        ProjectionIter {
            projection: self,
            next_year: 1,
            cumulative_cash_flow: 0.0,
        }
    }

    pub fn collect_years(&self) -> Vec<YearProjection> {
        self.iter().collect()
    }

    fn project_year(&self, year: u32, prior_cumulative: f64) -> YearProjection {
        let inputs = &self.inputs;
        let elapsed = i32::try_from(year - 1).unwrap_or(i32::MAX);

        let gross_rent = inputs.monthly_rent * 12.0 * (1.0 + inputs.rent_growth_rate).powi(elapsed);
        let vacancy_loss = gross_rent * inputs.vacancy_rate;
        let effective_gross_income = gross_rent - vacancy_loss;
        let expense_escalation = (1.0 + inputs.expense_growth_rate).powi(elapsed);
        let operating_expenses = inputs
            .operating_expenses
            .annual(effective_gross_income, expense_escalation);
        let net_operating_income = effective_gross_income - operating_expenses;

        let (loan_totals, loan_balance) = match &self.loan {
            Some(loan) => (
                loan.year_totals(year),
                loan.balance_after(year.saturating_mul(MONTHS_PER_YEAR)),
            ),
            None => (AnnualLoanTotals::default(), 0.0),
        };

        let net_cash_flow = net_operating_income - loan_totals.debt_service;

        YearProjection {
            year,
            property_value: appreciate(inputs.purchase_price, inputs.appreciation_rate, year),
            loan_balance,
            gross_rent,
            vacancy_loss,
            operating_expenses,
            net_operating_income,
            debt_service: loan_totals.debt_service,
            interest_paid: loan_totals.interest,
            principal_paid: loan_totals.principal,
            net_cash_flow,
            cumulative_cash_flow: prior_cumulative + net_cash_flow,
        }
    }
}

impl<'a> IntoIterator for &'a Projection {
    type Item = YearProjection;
    type IntoIter = ProjectionIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Single pass over a [`Projection`].
#[derive(Debug, Clone)]
pub struct ProjectionIter<'a> {
    projection: &'a Projection,
    next_year: u32,
    cumulative_cash_flow: f64,
}

impl Iterator for ProjectionIter<'_> {
    type Item = YearProjection;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_year > self.projection.inputs.holding_period_years {
            return None;
        }

        let entry = self
            .projection
            .project_year(self.next_year, self.cumulative_cash_flow);
        self.cumulative_cash_flow = entry.cumulative_cash_flow;
        self.next_year = self.next_year.saturating_add(1);
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .projection
            .inputs
            .holding_period_years
            .saturating_add(1)
            .saturating_sub(self.next_year) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProjectionIter<'_> {}

impl FusedIterator for ProjectionIter<'_> {}
