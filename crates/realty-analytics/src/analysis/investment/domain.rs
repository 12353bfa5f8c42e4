use serde::{Deserialize, Serialize};
use std::fmt;

use super::amortization::AmortizationError;

/// Longest loan term or holding period accepted, in years.
pub const MAX_YEARS: u32 = 100;

/// Down payment supplied either as a dollar amount or as a share of the price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DownPayment {
    Amount(f64),
    Percent(f64),
}

/// Operating expense model for the property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperatingExpenses {
    /// Share of effective gross income.
    Rate { rate: f64 },
    /// Flat monthly amount.
    Monthly { amount: f64 },
    Itemized {
        annual_taxes: f64,
        annual_insurance: f64,
        monthly_maintenance: f64,
        /// Property management fee as a share of effective gross income.
        management_fee_rate: f64,
    },
}

impl OperatingExpenses {
    /// Annual expenses for a year with the given effective income and escalation factor.
    pub(crate) fn annual(&self, effective_gross_income: f64, escalation: f64) -> f64 {
        match *self {
            Self::Rate { rate } => effective_gross_income * rate,
            Self::Monthly { amount } => amount * 12.0 * escalation,
            Self::Itemized {
                annual_taxes,
                annual_insurance,
                monthly_maintenance,
                management_fee_rate,
            } => {
                (annual_taxes + annual_insurance + monthly_maintenance * 12.0) * escalation
                    + effective_gross_income * management_fee_rate
            }
        }
    }
}

/// Regional reference constants supplied by the content layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketBenchmarks {
    pub appreciation_rate: f64,
    pub vacancy_rate: f64,
}

impl Default for MarketBenchmarks {
    fn default() -> Self {
        Self {
            appreciation_rate: 0.03,
            vacancy_rate: 0.05,
        }
    }
}

/// Caller-supplied assumptions for one calculation. Rates are decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentInputs {
    pub purchase_price: f64,
    pub down_payment: DownPayment,
    pub annual_interest_rate: f64,
    pub loan_term_years: u32,
    pub monthly_rent: f64,
    pub vacancy_rate: f64,
    pub operating_expenses: OperatingExpenses,
    pub appreciation_rate: f64,
    #[serde(default)]
    pub closing_costs: f64,
    #[serde(default)]
    pub rehab_budget: f64,
    pub holding_period_years: u32,
    #[serde(default)]
    pub rent_growth_rate: f64,
    #[serde(default)]
    pub expense_growth_rate: f64,
}

impl InvestmentInputs {
    pub fn down_payment_amount(&self) -> f64 {
        match self.down_payment {
            DownPayment::Amount(amount) => amount,
            DownPayment::Percent(share) => self.purchase_price * share,
        }
    }

    pub fn loan_amount(&self) -> f64 {
        (self.purchase_price - self.down_payment_amount()).max(0.0)
    }

    pub fn initial_cash_invested(&self) -> f64 {
        self.down_payment_amount() + self.closing_costs + self.rehab_budget
    }

    /// Checks every domain constraint, reporting the first violated field.
    pub fn validate(&self) -> Result<(), InvestmentError> {
        positive("purchase_price", self.purchase_price)?;

        match self.down_payment {
            DownPayment::Amount(amount) => {
                non_negative("down_payment", amount)?;
                if amount > self.purchase_price {
                    return Err(InvestmentError::invalid(
                        "down_payment",
                        Constraint::AtMostPurchasePrice,
                    ));
                }
            }
            DownPayment::Percent(share) => fraction("down_payment", share)?,
        }

        fraction("annual_interest_rate", self.annual_interest_rate)?;
        year_count("loan_term_years", self.loan_term_years)?;

        non_negative("monthly_rent", self.monthly_rent)?;
        fraction("vacancy_rate", self.vacancy_rate)?;

        match self.operating_expenses {
            OperatingExpenses::Rate { rate } => fraction("operating_expenses.rate", rate)?,
            OperatingExpenses::Monthly { amount } => {
                non_negative("operating_expenses.amount", amount)?
            }
            OperatingExpenses::Itemized {
                annual_taxes,
                annual_insurance,
                monthly_maintenance,
                management_fee_rate,
            } => {
                non_negative("operating_expenses.annual_taxes", annual_taxes)?;
                non_negative("operating_expenses.annual_insurance", annual_insurance)?;
                non_negative("operating_expenses.monthly_maintenance", monthly_maintenance)?;
                fraction("operating_expenses.management_fee_rate", management_fee_rate)?;
            }
        }

        growth_rate("appreciation_rate", self.appreciation_rate)?;
        non_negative("closing_costs", self.closing_costs)?;
        non_negative("rehab_budget", self.rehab_budget)?;

        year_count("holding_period_years", self.holding_period_years)?;

        growth_rate("rent_growth_rate", self.rent_growth_rate)?;
        growth_rate("expense_growth_rate", self.expense_growth_rate)?;

        Ok(())
    }
}

/// Incoming form payload; benchmark-backed rates may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRequest {
    pub purchase_price: f64,
    pub down_payment: DownPayment,
    pub annual_interest_rate: f64,
    pub loan_term_years: u32,
    pub monthly_rent: f64,
    #[serde(default)]
    pub vacancy_rate: Option<f64>,
    pub operating_expenses: OperatingExpenses,
    #[serde(default)]
    pub appreciation_rate: Option<f64>,
    #[serde(default)]
    pub closing_costs: f64,
    #[serde(default)]
    pub rehab_budget: f64,
    pub holding_period_years: u32,
    #[serde(default)]
    pub rent_growth_rate: f64,
    #[serde(default)]
    pub expense_growth_rate: f64,
}

impl InvestmentRequest {
    pub fn resolve(self, benchmarks: &MarketBenchmarks) -> InvestmentInputs {
        InvestmentInputs {
            purchase_price: self.purchase_price,
            down_payment: self.down_payment,
            annual_interest_rate: self.annual_interest_rate,
            loan_term_years: self.loan_term_years,
            monthly_rent: self.monthly_rent,
            vacancy_rate: self.vacancy_rate.unwrap_or(benchmarks.vacancy_rate),
            operating_expenses: self.operating_expenses,
            appreciation_rate: self
                .appreciation_rate
                .unwrap_or(benchmarks.appreciation_rate),
            closing_costs: self.closing_costs,
            rehab_budget: self.rehab_budget,
            holding_period_years: self.holding_period_years,
            rent_growth_rate: self.rent_growth_rate,
            expense_growth_rate: self.expense_growth_rate,
        }
    }
}

/// Violated constraint, carried alongside the field for form feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    Finite,
    Positive,
    NonNegative,
    Fraction,
    GrowthRate,
    AtMostMaxYears,
    AtMostPurchasePrice,
    NonEmpty,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Constraint::Finite => "must be a finite number",
            Constraint::Positive => "must be greater than zero",
            Constraint::NonNegative => "must not be negative",
            Constraint::Fraction => "must be a decimal between 0 and 1",
            Constraint::GrowthRate => "must be a decimal between -1 (exclusive) and 1",
            Constraint::AtMostMaxYears => "must not exceed 100 years",
            Constraint::AtMostPurchasePrice => "must not exceed the purchase price",
            Constraint::NonEmpty => "must contain at least one year",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvestmentError {
    #[error("invalid input: {field} {constraint}")]
    InvalidInput {
        field: &'static str,
        constraint: Constraint,
    },
}

impl InvestmentError {
    pub(crate) fn invalid(field: &'static str, constraint: Constraint) -> Self {
        Self::InvalidInput { field, constraint }
    }
}

impl From<AmortizationError> for InvestmentError {
    fn from(value: AmortizationError) -> Self {
        match value {
            AmortizationError::InvalidPrincipal(_) => {
                Self::invalid("loan_amount", Constraint::NonNegative)
            }
            AmortizationError::InvalidRate(_) => {
                Self::invalid("annual_interest_rate", Constraint::Fraction)
            }
            AmortizationError::InvalidTerm => {
                Self::invalid("loan_term_years", Constraint::Positive)
            }
        }
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), InvestmentError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(InvestmentError::invalid(field, Constraint::Finite))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), InvestmentError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(InvestmentError::invalid(field, Constraint::Positive))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), InvestmentError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(InvestmentError::invalid(field, Constraint::NonNegative))
    }
}

fn fraction(field: &'static str, value: f64) -> Result<(), InvestmentError> {
    finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(InvestmentError::invalid(field, Constraint::Fraction))
    }
}

fn year_count(field: &'static str, years: u32) -> Result<(), InvestmentError> {
    if years == 0 {
        Err(InvestmentError::invalid(field, Constraint::Positive))
    } else if years > MAX_YEARS {
        Err(InvestmentError::invalid(field, Constraint::AtMostMaxYears))
    } else {
        Ok(())
    }
}

fn growth_rate(field: &'static str, value: f64) -> Result<(), InvestmentError> {
    finite(field, value)?;
    if value > -1.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(InvestmentError::invalid(field, Constraint::GrowthRate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> InvestmentInputs {
        InvestmentInputs {
            purchase_price: 300_000.0,
            down_payment: DownPayment::Amount(60_000.0),
            annual_interest_rate: 0.065,
            loan_term_years: 30,
            monthly_rent: 2_400.0,
            vacancy_rate: 0.05,
            operating_expenses: OperatingExpenses::Monthly { amount: 700.0 },
            appreciation_rate: 0.03,
            closing_costs: 6_000.0,
            rehab_budget: 4_000.0,
            holding_period_years: 10,
            rent_growth_rate: 0.0,
            expense_growth_rate: 0.0,
        }
    }

    #[test]
    fn derived_cash_figures() {
        let inputs = inputs();
        assert_eq!(inputs.down_payment_amount(), 60_000.0);
        assert_eq!(inputs.loan_amount(), 240_000.0);
        assert_eq!(inputs.initial_cash_invested(), 70_000.0);
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn down_payment_above_price_names_the_field() {
        let mut inputs = inputs();
        inputs.down_payment = DownPayment::Amount(300_001.0);
        assert_eq!(
            inputs.validate(),
            Err(InvestmentError::InvalidInput {
                field: "down_payment",
                constraint: Constraint::AtMostPurchasePrice,
            })
        );
    }

    #[test]
    fn negative_rent_and_zero_holding_period_are_rejected() {
        let mut negative_rent = inputs();
        negative_rent.monthly_rent = -1.0;
        assert!(matches!(
            negative_rent.validate(),
            Err(InvestmentError::InvalidInput { field: "monthly_rent", .. })
        ));

        let mut no_hold = inputs();
        no_hold.holding_period_years = 0;
        assert_eq!(
            no_hold.validate(),
            Err(InvestmentError::invalid("holding_period_years", Constraint::Positive))
        );
    }

    #[test]
    fn year_counts_are_capped() {
        let mut long_hold = inputs();
        long_hold.holding_period_years = MAX_YEARS;
        assert!(long_hold.validate().is_ok());

        long_hold.holding_period_years = u32::MAX;
        assert_eq!(
            long_hold.validate(),
            Err(InvestmentError::invalid(
                "holding_period_years",
                Constraint::AtMostMaxYears
            ))
        );

        let mut long_loan = inputs();
        long_loan.loan_term_years = MAX_YEARS + 1;
        assert_eq!(
            long_loan.validate(),
            Err(InvestmentError::invalid("loan_term_years", Constraint::AtMostMaxYears))
        );
    }

    #[test]
    fn growth_rates_report_their_range() {
        let mut runaway = inputs();
        runaway.rent_growth_rate = 1.5;
        assert_eq!(
            runaway.validate(),
            Err(InvestmentError::invalid("rent_growth_rate", Constraint::GrowthRate))
        );
    }

    #[test]
    fn negative_appreciation_is_allowed_but_bounded() {
        let mut declining = inputs();
        declining.appreciation_rate = -0.04;
        assert!(declining.validate().is_ok());

        declining.appreciation_rate = -1.0;
        assert!(declining.validate().is_err());
    }

    #[test]
    fn itemized_fee_rate_must_be_a_fraction() {
        let mut itemized = inputs();
        itemized.operating_expenses = OperatingExpenses::Itemized {
            annual_taxes: 3_600.0,
            annual_insurance: 1_200.0,
            monthly_maintenance: 150.0,
            management_fee_rate: 8.0,
        };
        assert_eq!(
            itemized.validate(),
            Err(InvestmentError::invalid(
                "operating_expenses.management_fee_rate",
                Constraint::Fraction
            ))
        );
    }

    #[test]
    fn request_falls_back_to_benchmarks() {
        let request = InvestmentRequest {
            purchase_price: 200_000.0,
            down_payment: DownPayment::Percent(0.25),
            annual_interest_rate: 0.06,
            loan_term_years: 30,
            monthly_rent: 1_800.0,
            vacancy_rate: None,
            operating_expenses: OperatingExpenses::Rate { rate: 0.35 },
            appreciation_rate: Some(0.01),
            closing_costs: 0.0,
            rehab_budget: 0.0,
            holding_period_years: 5,
            rent_growth_rate: 0.0,
            expense_growth_rate: 0.0,
        };
        let benchmarks = MarketBenchmarks {
            appreciation_rate: 0.04,
            vacancy_rate: 0.07,
        };

        let inputs = request.resolve(&benchmarks);
        assert_eq!(inputs.vacancy_rate, 0.07);
        assert_eq!(inputs.appreciation_rate, 0.01);
        assert_eq!(inputs.down_payment_amount(), 50_000.0);
    }

    #[test]
    fn inputs_deserialize_from_form_json() {
        let json = r#"{
            "purchase_price": 250000,
            "down_payment": { "kind": "percent", "value": 0.2 },
            "annual_interest_rate": 0.07,
            "loan_term_years": 30,
            "monthly_rent": 2000,
            "vacancy_rate": 0.05,
            "operating_expenses": { "kind": "monthly", "amount": 600 },
            "appreciation_rate": 0.03,
            "holding_period_years": 5
        }"#;
        let inputs: InvestmentInputs = serde_json::from_str(json).expect("payload parses");
        assert_eq!(inputs.down_payment, DownPayment::Percent(0.2));
        assert_eq!(inputs.closing_costs, 0.0);
        assert!(inputs.validate().is_ok());
    }
}
