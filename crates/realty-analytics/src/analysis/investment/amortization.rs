use serde::{Deserialize, Serialize};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Domain failures for loan construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AmortizationError {
    #[error("loan principal must be a non-negative finite amount (got {0})")]
    InvalidPrincipal(f64),
    #[error("annual interest rate must be a non-negative finite decimal (got {0})")]
    InvalidRate(f64),
    #[error("loan term must be at least one year")]
    InvalidTerm,
}

/// Fixed-rate, fully amortizing loan paid monthly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizingLoan {
    principal: f64,
    annual_rate: f64,
    term_years: u32,
}

/// Interest/principal breakdown for one monthly period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodSplit {
    pub period: u32,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub balance: f64,
}

/// Twelve-period totals for one loan year.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnualLoanTotals {
    pub interest: f64,
    pub principal: f64,
    pub debt_service: f64,
}

impl AmortizingLoan {
    pub fn new(
        principal: f64,
        annual_rate: f64,
        term_years: u32,
    ) -> Result<Self, AmortizationError> {
        if !principal.is_finite() || principal < 0.0 {
            return Err(AmortizationError::InvalidPrincipal(principal));
        }
        if !annual_rate.is_finite() || annual_rate < 0.0 {
            return Err(AmortizationError::InvalidRate(annual_rate));
        }
        if term_years == 0 {
            return Err(AmortizationError::InvalidTerm);
        }

        Ok(Self {
            principal,
            annual_rate,
            term_years,
        })
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    pub fn total_periods(&self) -> u32 {
        self.term_years.saturating_mul(MONTHS_PER_YEAR)
    }

    pub fn periodic_rate(&self) -> f64 {
        self.annual_rate / f64::from(MONTHS_PER_YEAR)
    }

    /// Level monthly payment. A zero rate degrades to straight-line repayment.
    pub fn monthly_payment(&self) -> f64 {
        if self.principal == 0.0 {
            return 0.0;
        }

        let periods = f64::from(self.total_periods());
        let rate = self.periodic_rate();
        if rate == 0.0 {
            self.principal / periods
        } else {
            self.principal * rate / (1.0 - (1.0 + rate).powf(-periods))
        }
    }

    /// Remaining balance after `periods` monthly payments, exactly zero once the term is served.
    pub fn balance_after(&self, periods: u32) -> f64 {
        if periods >= self.total_periods() {
            return 0.0;
        }
        if periods == 0 {
            return self.principal;
        }

        let payment = self.monthly_payment();
        let elapsed = f64::from(periods);
        let rate = self.periodic_rate();
        let balance = if rate == 0.0 {
            self.principal - payment * elapsed
        } else {
            let growth = (1.0 + rate).powf(elapsed);
            self.principal * growth - payment * (growth - 1.0) / rate
        };

        balance.max(0.0)
    }

    /// Split of the 1-based `period`. Periods outside the term yield an all-zero split.
    pub fn period_split(&self, period: u32) -> PeriodSplit {
        if period == 0 || period > self.total_periods() {
            return PeriodSplit {
                period,
                ..PeriodSplit::default()
            };
        }

        let opening = self.balance_after(period - 1);
        let closing = self.balance_after(period);
        let interest = opening * self.periodic_rate();
        let principal = opening - closing;

        PeriodSplit {
            period,
            payment: interest + principal,
            interest,
            principal,
            balance: closing,
        }
    }

    /// Totals for the 1-based loan `year`; zero once the loan is retired.
    pub fn year_totals(&self, year: u32) -> AnnualLoanTotals {
        if year == 0 {
            return AnnualLoanTotals::default();
        }

        let first = (year - 1).saturating_mul(MONTHS_PER_YEAR) + 1;
        let last = year.saturating_mul(MONTHS_PER_YEAR);
        (first..=last)
            .map(|period| self.period_split(period))
            .fold(AnnualLoanTotals::default(), |mut totals, split| {
                totals.interest += split.interest;
                totals.principal += split.principal;
                totals.debt_service += split.payment;
                totals
            })
    }
}

/// Compound growth of `base_value` over `years` at `annual_rate`. Negative rates model decline.
pub fn appreciate(base_value: f64, annual_rate: f64, years: u32) -> f64 {
    let exponent = i32::try_from(years).unwrap_or(i32::MAX);
    base_value * (1.0 + annual_rate).powi(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn thirty_year_payment_matches_standard_formula() {
        let loan = AmortizingLoan::new(200_000.0, 0.07, 30).expect("valid loan");
        assert!(close(loan.monthly_payment(), 1330.60, 0.01));
        assert_eq!(loan.total_periods(), 360);
    }

    #[test]
    fn zero_rate_degrades_to_straight_line() {
        let loan = AmortizingLoan::new(120_000.0, 0.0, 10).expect("valid loan");
        assert!(close(loan.monthly_payment(), 1000.0, 1e-9));
        assert!(close(loan.balance_after(60), 60_000.0, 1e-6));
        let split = loan.period_split(1);
        assert_eq!(split.interest, 0.0);
        assert!(close(split.principal, 1000.0, 1e-9));
    }

    #[test]
    fn balance_clamps_to_zero_at_and_beyond_term() {
        let loan = AmortizingLoan::new(150_000.0, 0.05, 15).expect("valid loan");
        assert_eq!(loan.balance_after(180), 0.0);
        assert_eq!(loan.balance_after(400), 0.0);
        assert!(loan.balance_after(179) > 0.0);
    }

    #[test]
    fn final_period_retires_remaining_balance() {
        let loan = AmortizingLoan::new(50_000.0, 0.06, 5).expect("valid loan");
        let last = loan.period_split(60);
        assert_eq!(last.balance, 0.0);
        assert!(close(last.payment, loan.monthly_payment(), 0.01));
        assert_eq!(loan.period_split(61), PeriodSplit { period: 61, ..PeriodSplit::default() });
    }

    #[test]
    fn year_totals_reconcile_with_balance_change() {
        let loan = AmortizingLoan::new(200_000.0, 0.07, 30).expect("valid loan");
        let totals = loan.year_totals(1);
        let paid_down = loan.principal() - loan.balance_after(12);
        assert!(close(totals.principal, paid_down, 1e-6));
        assert!(close(totals.debt_service, loan.monthly_payment() * 12.0, 1e-6));
        assert!(totals.interest > totals.principal);
        assert_eq!(loan.year_totals(31), AnnualLoanTotals::default());
    }

    #[test]
    fn rejects_out_of_domain_inputs() {
        assert_eq!(
            AmortizingLoan::new(-1.0, 0.05, 30),
            Err(AmortizationError::InvalidPrincipal(-1.0))
        );
        assert_eq!(
            AmortizingLoan::new(100.0, -0.01, 30),
            Err(AmortizationError::InvalidRate(-0.01))
        );
        assert_eq!(AmortizingLoan::new(100.0, 0.05, 0), Err(AmortizationError::InvalidTerm));
    }

    #[test]
    fn zero_principal_has_no_payment() {
        let loan = AmortizingLoan::new(0.0, 0.05, 30).expect("valid loan");
        assert_eq!(loan.monthly_payment(), 0.0);
        assert_eq!(loan.balance_after(12), 0.0);
    }

    #[test]
    fn appreciation_compounds_and_allows_decline() {
        assert!(close(appreciate(250_000.0, 0.03, 1), 257_500.0, 1e-6));
        assert!(close(appreciate(100_000.0, 0.10, 2), 121_000.0, 1e-6));
        assert_eq!(appreciate(100_000.0, 0.0, 7), 100_000.0);
        assert!(appreciate(100_000.0, -0.02, 3) < 100_000.0);
    }
}
