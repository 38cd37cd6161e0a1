//! Savings growth and loan payment calculators.

use fintrack_domain::{CompoundProjection, LoanQuote};

use crate::{
    error::{CoreError, ValidationError},
    validation::{non_negative_amount, positive_amount},
};

pub struct CalculatorService;

impl CalculatorService {
    /// Compounds monthly at `annual_rate_pct / 12`, adding the contribution after each month.
    pub fn compound(
        principal: f64,
        annual_rate_pct: f64,
        monthly_contribution: f64,
        years: u32,
    ) -> Result<CompoundProjection, CoreError> {
        non_negative_amount("principal", principal)?;
        non_negative_amount("rate", annual_rate_pct)?;
        non_negative_amount("contribution", monthly_contribution)?;

        let months = years.saturating_mul(12);
        let monthly_rate = annual_rate_pct / 100.0 / 12.0;
        let final_balance = (0..months).fold(principal, |total, _| {
            total * (1.0 + monthly_rate) + monthly_contribution
        });
        let total_contributed = principal + monthly_contribution * f64::from(months);
        Ok(CompoundProjection {
            months,
            final_balance,
            total_contributed,
            interest_earned: final_balance - total_contributed,
        })
    }

    /// Fixed monthly payment that amortises `principal` over `months`.
    pub fn loan(principal: f64, annual_rate_pct: f64, months: u32) -> Result<LoanQuote, CoreError> {
        positive_amount("principal", principal)?;
        non_negative_amount("rate", annual_rate_pct)?;
        if months == 0 {
            return Err(ValidationError::NonPositiveAmount {
                field: "months",
                value: 0.0,
            }
            .into());
        }

        let periods = f64::from(months);
        let monthly_rate = annual_rate_pct / 100.0 / 12.0;
        let monthly_payment = if monthly_rate == 0.0 {
            principal / periods
        } else {
            principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-periods))
        };
        let total_payment = monthly_payment * periods;
        Ok(LoanQuote {
            monthly_payment,
            total_payment,
            total_interest: total_payment - principal,
        })
    }
}
