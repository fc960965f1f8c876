//! Month-by-month amortization of a fixed-rate KPR loan.
//!
//! Each installment is the annuity payment from [`compute_monthly_payment`];
//! interest accrues on the opening balance and the remainder of the payment
//! reduces principal. The final installment absorbs any residual balance
//! left by decimal rounding.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::profile::{MAX_ANNUAL_RATE_PCT, MAX_TERM_YEARS};
use crate::time_value::{compute_monthly_payment, monthly_rate, term_months, MONTHS_PER_YEAR};
use crate::{types::*, KprError, KprResult};

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    pub annual_interest_rate_pct: Percent,
    pub term_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// Installment number (1-indexed)
    pub month: u32,
    pub opening_balance: Money,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: u32,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub rows: Vec<AmortizationRow>,
    pub yearly: Vec<YearlySummary>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn build_amortization_schedule(
    input: &AmortizationInput,
) -> KprResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let months = term_months(input.term_years);
    let rate = monthly_rate(input.annual_interest_rate_pct);
    let payment = compute_monthly_payment(input.principal, input.annual_interest_rate_pct, months);

    let rows = amortize(input.principal, rate, payment, months)?;
    if rows.is_empty() {
        warnings.push("Principal is zero; there is nothing to amortize.".into());
    }

    // Yearly sums are bounded by these totals, so only the totals are checked
    let total_paid = checked_total(rows.iter().map(|r| r.payment))?;
    let total_interest = checked_total(rows.iter().map(|r| r.interest))?;
    let yearly = summarize_by_year(&rows);

    let output = AmortizationOutput {
        monthly_payment: payment,
        total_paid,
        total_interest,
        rows,
        yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "term_months": months,
        "monthly_rate": rate.to_string(),
        "final_installment": "absorbs residual balance",
    });

    Ok(with_metadata(
        "Fixed-rate annuity amortization (effective interest)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn amortize(
    principal: Money,
    rate: Rate,
    payment: Money,
    months: u32,
) -> KprResult<Vec<AmortizationRow>> {
    let mut rows = Vec::with_capacity(months as usize);
    let mut balance = principal;

    for month in 1..=months {
        if balance <= Decimal::ZERO {
            break;
        }
        let opening = balance;
        let interest = opening.checked_mul(rate).ok_or_else(too_large)?;
        let mut reduction = payment.checked_sub(interest).ok_or_else(too_large)?;
        if month == months || reduction > opening {
            reduction = opening;
        }
        balance = opening.checked_sub(reduction).ok_or_else(too_large)?;

        rows.push(AmortizationRow {
            month,
            opening_balance: opening,
            payment: reduction.checked_add(interest).ok_or_else(too_large)?,
            interest,
            principal: reduction,
            closing_balance: balance,
        });
    }

    Ok(rows)
}

fn checked_total(mut amounts: impl Iterator<Item = Money>) -> KprResult<Money> {
    amounts.try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount).ok_or_else(too_large)
    })
}

fn too_large() -> KprError {
    KprError::InvalidInput {
        field: "principal".into(),
        reason: "Principal is too large to amortize within decimal range.".into(),
    }
}

fn summarize_by_year(rows: &[AmortizationRow]) -> Vec<YearlySummary> {
    rows.chunks(MONTHS_PER_YEAR as usize)
        .enumerate()
        .map(|(i, chunk)| YearlySummary {
            year: i as u32 + 1,
            interest_paid: chunk.iter().map(|r| r.interest).sum(),
            principal_paid: chunk.iter().map(|r| r.principal).sum(),
            closing_balance: chunk
                .last()
                .map(|r| r.closing_balance)
                .unwrap_or(Decimal::ZERO),
        })
        .collect()
}

fn validate_input(input: &AmortizationInput) -> KprResult<()> {
    if input.principal < Decimal::ZERO {
        return Err(KprError::InvalidInput {
            field: "principal".into(),
            reason: "Principal cannot be negative.".into(),
        });
    }
    if input.term_years == 0 || input.term_years > MAX_TERM_YEARS {
        return Err(KprError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Term must be between 1 and {MAX_TERM_YEARS} years."),
        });
    }
    if input.annual_interest_rate_pct < Decimal::ZERO
        || input.annual_interest_rate_pct > MAX_ANNUAL_RATE_PCT
    {
        return Err(KprError::InvalidInput {
            field: "annual_interest_rate_pct".into(),
            reason: format!("Annual rate must be between 0 and {MAX_ANNUAL_RATE_PCT} percent."),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_input() -> AmortizationInput {
        AmortizationInput {
            principal: dec!(600_000_000),
            annual_interest_rate_pct: dec!(10.5),
            term_years: 15,
        }
    }

    #[test]
    fn test_schedule_length() {
        let result = build_amortization_schedule(&base_input()).unwrap();
        assert_eq!(result.result.rows.len(), 180);
        assert_eq!(result.result.yearly.len(), 15);
    }

    #[test]
    fn test_first_row_interest() {
        let result = build_amortization_schedule(&base_input()).unwrap();
        let first = &result.result.rows[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.opening_balance, dec!(600_000_000));
        // 600M * 0.00875
        assert_eq!(first.interest, dec!(5_250_000));
        assert!((first.principal - (first.payment - first.interest)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_schedule_fully_amortizes() {
        let result = build_amortization_schedule(&base_input()).unwrap();
        let out = &result.result;
        let last = out.rows.last().unwrap();
        assert_eq!(last.closing_balance, Decimal::ZERO);
        let principal_repaid: Money = out.rows.iter().map(|r| r.principal).sum();
        assert!((principal_repaid - dec!(600_000_000)).abs() < dec!(0.000001));
        let implied_interest = out.total_paid - dec!(600_000_000);
        assert!((out.total_interest - implied_interest).abs() < dec!(0.000001));
        // Last installment only differs from the others by rounding residue
        assert!((last.payment - out.monthly_payment).abs() < dec!(0.01));
    }

    #[test]
    fn test_zero_rate_has_no_interest() {
        let input = AmortizationInput {
            principal: dec!(1_200_000),
            annual_interest_rate_pct: Decimal::ZERO,
            term_years: 1,
        };
        let result = build_amortization_schedule(&input).unwrap();
        assert_eq!(result.result.monthly_payment, dec!(100_000));
        assert_eq!(result.result.total_interest, Decimal::ZERO);
        assert_eq!(result.result.yearly[0].principal_paid, dec!(1_200_000));
    }

    #[test]
    fn test_zero_principal_warns() {
        let input = AmortizationInput {
            principal: Decimal::ZERO,
            annual_interest_rate_pct: dec!(9),
            term_years: 10,
        };
        let result = build_amortization_schedule(&input).unwrap();
        assert!(result.result.rows.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_invalid_term_rejected() {
        let mut input = base_input();
        input.term_years = 40;
        match build_amortization_schedule(&input).unwrap_err() {
            KprError::InvalidInput { field, .. } => assert_eq!(field, "term_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_principal_beyond_decimal_range_rejected() {
        let input = AmortizationInput {
            principal: dec!(70_000_000_000_000_000_000_000_000_000),
            annual_interest_rate_pct: dec!(10),
            term_years: 30,
        };
        match build_amortization_schedule(&input).unwrap_err() {
            KprError::InvalidInput { field, .. } => assert_eq!(field, "principal"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
