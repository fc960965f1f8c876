use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent, Rate};

pub const MONTHS_PER_YEAR: u32 = 12;

/// Monthly periodic rate from an annual percentage (10.5 -> 0.00875).
pub fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    annual_rate_pct / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// Number of monthly installments in a term of whole years.
pub fn term_months(years: u32) -> u32 {
    years.saturating_mul(MONTHS_PER_YEAR)
}

/// Largest monthly installment that keeps the debt-service ratio within
/// `dsr_fraction` of disposable income. Never negative.
pub fn installment_capacity(net_income: Money, expenses: Money, dsr_fraction: Rate) -> Money {
    net_income
        .checked_sub(expenses)
        .and_then(|disposable| disposable.checked_mul(dsr_fraction))
        .map(|capacity| capacity.max(Decimal::ZERO))
        .unwrap_or(Decimal::ZERO)
}

/// Fixed annuity installment that amortises `principal` over `months`.
///
/// Degenerate inputs (no principal, no term, a rate that collapses the
/// annuity factor) yield zero rather than an error.
pub fn compute_monthly_payment(principal: Money, annual_rate_pct: Percent, months: u32) -> Money {
    if principal <= Decimal::ZERO || months == 0 {
        return Decimal::ZERO;
    }

    let rate = monthly_rate(annual_rate_pct);
    if rate.is_zero() {
        return principal / Decimal::from(months);
    }

    annuity_discount(rate, months)
        .and_then(|discount| principal.checked_mul(rate)?.checked_div(discount))
        .map(|payment| payment.max(Decimal::ZERO))
        .unwrap_or(Decimal::ZERO)
}

/// Inverse of [`compute_monthly_payment`]: the principal whose installment
/// equals the DSR-limited capacity of the borrower.
pub fn compute_max_principal_under_dsr(
    net_income: Money,
    expenses: Money,
    dsr_fraction: Rate,
    annual_rate_pct: Percent,
    years: u32,
) -> Money {
    let months = term_months(years);
    if months == 0 {
        return Decimal::ZERO;
    }

    let capacity = installment_capacity(net_income, expenses, dsr_fraction);
    if capacity.is_zero() {
        return Decimal::ZERO;
    }

    let rate = monthly_rate(annual_rate_pct);
    if rate.is_zero() {
        return capacity
            .checked_mul(Decimal::from(months))
            .unwrap_or(Decimal::ZERO);
    }

    annuity_discount(rate, months)
        .and_then(|discount| capacity.checked_mul(discount)?.checked_div(rate))
        .map(|principal| principal.max(Decimal::ZERO))
        .unwrap_or(Decimal::ZERO)
}

/// `1 - (1 + r)^-n`, or `None` when the factor is zero or undefined.
fn annuity_discount(rate: Rate, months: u32) -> Option<Decimal> {
    let base = Decimal::ONE.checked_add(rate)?;
    if base <= Decimal::ZERO {
        return None;
    }

    let discount = match base.checked_powi(i64::from(months)) {
        Some(growth) => Decimal::ONE - Decimal::ONE.checked_div(growth)?,
        // Growth beyond the decimal range: its reciprocal is indistinguishable from zero.
        None => Decimal::ONE,
    };

    if discount.is_zero() {
        None
    } else {
        Some(discount)
    }
}
