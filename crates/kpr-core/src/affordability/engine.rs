use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::profile::{AffordabilityInput, BorrowerProfile, PolicyThresholds};
use crate::time_value::{
    compute_max_principal_under_dsr, compute_monthly_payment, installment_capacity, term_months,
};
use crate::{types::*, KprResult};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Derived affordability metrics for one profile under one policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffordabilityResult {
    pub loan_need: Money,
    pub loan_to_value: Rate,
    pub estimated_monthly_payment: Money,
    pub max_principal_under_dsr: Money,
    pub dsr_used: Rate,
    pub dsr_compliant: bool,
    pub ltv_compliant: bool,
    /// Income after expenses; negative when expenses exceed income.
    pub disposable_income: Money,
    pub max_installment_under_dsr: Money,
    /// Smallest down payment that satisfies both the DSR and the LTV limit.
    pub required_down_payment: Money,
}

impl AffordabilityResult {
    pub fn eligible(&self) -> bool {
        self.dsr_compliant && self.ltv_compliant
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate a profile against policy thresholds.
///
/// Total over every well-formed input: zero income, zero price, inverted
/// down payment and zero rates all degrade to zero metrics and default
/// compliance flags instead of failing.
pub fn evaluate(profile: &BorrowerProfile, thresholds: &PolicyThresholds) -> AffordabilityResult {
    let price = profile.property_price;
    let loan_need = price
        .checked_sub(profile.down_payment)
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO);

    let loan_to_value = if price > Decimal::ZERO {
        loan_need.checked_div(price).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    let estimated_monthly_payment = compute_monthly_payment(
        loan_need,
        profile.annual_interest_rate_pct,
        term_months(profile.term_years),
    );

    let max_principal_under_dsr = compute_max_principal_under_dsr(
        profile.net_monthly_income,
        profile.monthly_expenses,
        thresholds.max_dsr,
        profile.annual_interest_rate_pct,
        profile.term_years,
    );

    let disposable_income = profile.disposable_income();
    let has_disposable = disposable_income > Decimal::ZERO;
    let dsr_used = if has_disposable {
        estimated_monthly_payment
            .checked_div(disposable_income.max(Decimal::ONE))
            .unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    // A zero-price property has nothing to finance, so it cannot breach LTV.
    let ltv_compliant = if price > Decimal::ZERO {
        loan_to_value <= thresholds.max_ltv
    } else {
        true
    };

    AffordabilityResult {
        loan_need,
        loan_to_value,
        estimated_monthly_payment,
        max_principal_under_dsr,
        dsr_used,
        dsr_compliant: has_disposable && dsr_used <= thresholds.max_dsr,
        ltv_compliant,
        disposable_income,
        max_installment_under_dsr: installment_capacity(
            profile.net_monthly_income,
            profile.monthly_expenses,
            thresholds.max_dsr,
        ),
        required_down_payment: required_down_payment(
            price,
            max_principal_under_dsr,
            thresholds.max_ltv,
        ),
    }
}

/// Validate the request, evaluate it and wrap the result with methodology,
/// assumptions and warnings.
pub fn analyze_affordability(
    input: &AffordabilityInput,
) -> KprResult<ComputationOutput<AffordabilityResult>> {
    let start = Instant::now();

    if let Err(e) = input.validate() {
        tracing::warn!(error = %e, "rejected affordability input");
        return Err(e);
    }

    let profile = &input.profile;
    let thresholds = &input.thresholds;
    let result = evaluate(profile, thresholds);

    tracing::debug!(
        loan_need = %result.loan_need,
        payment = %result.estimated_monthly_payment,
        dsr_used = %result.dsr_used,
        ltv = %result.loan_to_value,
        "evaluated affordability"
    );

    let mut warnings: Vec<String> = Vec::new();
    if profile.down_payment > profile.property_price {
        warnings.push("Down payment exceeds the property price; no loan is needed.".into());
    }
    if result.disposable_income <= Decimal::ZERO {
        warnings.push(
            "Monthly expenses consume all net income; DSR cannot be evaluated.".into(),
        );
    } else if !result.dsr_compliant {
        warnings.push(format!(
            "Estimated installment uses {} of disposable income, above the {} limit.",
            result.dsr_used.round_dp(4),
            thresholds.max_dsr
        ));
    }
    if !result.ltv_compliant {
        warnings.push(format!(
            "Loan-to-value {} exceeds the {} limit.",
            result.loan_to_value.round_dp(4),
            thresholds.max_ltv
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "term_months": term_months(profile.term_years),
        "max_dsr": thresholds.max_dsr.to_string(),
        "max_ltv": thresholds.max_ltv.to_string(),
        "rate_convention": "annual percent / 12, monthly compounding",
    });

    Ok(with_metadata(
        "KPR Affordability (annuity installment, DSR/LTV limits)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn required_down_payment(price: Money, max_principal: Money, max_ltv: Rate) -> Money {
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let for_dsr = price.checked_sub(max_principal).unwrap_or(Decimal::ZERO);
    let for_ltv = price
        .checked_mul(Decimal::ONE - max_ltv)
        .unwrap_or(Decimal::ZERO);
    for_dsr.max(for_ltv).max(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KprError;
    use rust_decimal_macros::dec;

    fn sample_profile() -> BorrowerProfile {
        BorrowerProfile {
            net_monthly_income: dec!(8_500_000),
            monthly_expenses: dec!(3_000_000),
            property_price: dec!(750_000_000),
            down_payment: dec!(150_000_000),
            term_years: 15,
            annual_interest_rate_pct: dec!(10.5),
        }
    }

    #[test]
    fn test_reference_scenario() {
        let result = evaluate(&sample_profile(), &PolicyThresholds::default());
        assert_eq!(result.loan_need, dec!(600_000_000));
        assert_eq!(result.loan_to_value, dec!(0.8));
        assert!(result.ltv_compliant);
        // ~6,632,393.54
        assert!((result.estimated_monthly_payment - dec!(6_632_393.54)).abs() < dec!(0.01));
        // 6.63M / 5.5M ~ 1.2059
        assert!((result.dsr_used - dec!(1.2059)).abs() < dec!(0.0001));
        assert!(!result.dsr_compliant);
        assert!(!result.eligible());
        assert_eq!(result.disposable_income, dec!(5_500_000));
        assert_eq!(result.max_installment_under_dsr, dec!(3_300_000));
    }

    #[test]
    fn test_required_down_payment_binds_on_dsr() {
        let result = evaluate(&sample_profile(), &PolicyThresholds::default());
        // price - max principal (~298.53M) dominates price * 5%
        let expected = dec!(750_000_000) - result.max_principal_under_dsr;
        assert_eq!(result.required_down_payment, expected);

        let mut profile = sample_profile();
        profile.down_payment = result.required_down_payment + Decimal::ONE;
        let retried = evaluate(&profile, &PolicyThresholds::default());
        assert!(retried.dsr_compliant);
        assert!(retried.ltv_compliant);
    }

    #[test]
    fn test_required_down_payment_binds_on_ltv() {
        let profile = BorrowerProfile {
            net_monthly_income: dec!(100_000_000),
            monthly_expenses: Decimal::ZERO,
            property_price: dec!(500_000_000),
            down_payment: Decimal::ZERO,
            term_years: 20,
            annual_interest_rate_pct: dec!(8),
        };
        let thresholds = PolicyThresholds {
            max_dsr: dec!(0.4),
            max_ltv: dec!(0.9),
        };
        let result = evaluate(&profile, &thresholds);
        assert!(result.dsr_compliant);
        assert!(!result.ltv_compliant);
        assert_eq!(result.required_down_payment, dec!(50_000_000));
    }

    #[test]
    fn test_all_zero_profile() {
        let profile = BorrowerProfile {
            net_monthly_income: Decimal::ZERO,
            monthly_expenses: Decimal::ZERO,
            property_price: Decimal::ZERO,
            down_payment: Decimal::ZERO,
            term_years: 0,
            annual_interest_rate_pct: Decimal::ZERO,
        };
        let result = evaluate(&profile, &PolicyThresholds::default());
        assert_eq!(result.loan_need, Decimal::ZERO);
        assert_eq!(result.loan_to_value, Decimal::ZERO);
        assert_eq!(result.estimated_monthly_payment, Decimal::ZERO);
        assert_eq!(result.max_principal_under_dsr, Decimal::ZERO);
        assert_eq!(result.dsr_used, Decimal::ZERO);
        assert!(!result.dsr_compliant);
        assert!(result.ltv_compliant);
    }

    #[test]
    fn test_down_payment_above_price() {
        let mut profile = sample_profile();
        profile.down_payment = dec!(900_000_000);
        let result = evaluate(&profile, &PolicyThresholds::default());
        assert_eq!(result.loan_need, Decimal::ZERO);
        assert_eq!(result.estimated_monthly_payment, Decimal::ZERO);
        assert_eq!(result.dsr_used, Decimal::ZERO);
        assert!(result.dsr_compliant);
        assert!(result.ltv_compliant);
    }

    #[test]
    fn test_small_disposable_income_floors_divisor() {
        let profile = BorrowerProfile {
            net_monthly_income: dec!(1.5),
            monthly_expenses: dec!(1),
            property_price: dec!(1_200),
            down_payment: Decimal::ZERO,
            term_years: 1,
            annual_interest_rate_pct: Decimal::ZERO,
        };
        let result = evaluate(&profile, &PolicyThresholds::default());
        // payment 100 divided by max(1, 0.5)
        assert_eq!(result.dsr_used, dec!(100));
    }

    #[test]
    fn test_analyze_warnings() {
        let input = AffordabilityInput {
            borrower_name: Some("Budi".into()),
            profile: sample_profile(),
            thresholds: PolicyThresholds::default(),
        };
        let output = analyze_affordability(&input).unwrap();
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("disposable income"));
        assert_eq!(output.metadata.currency, "IDR");
        assert!(!output.methodology.is_empty());
    }

    #[test]
    fn test_analyze_rejects_invalid_threshold() {
        let input = AffordabilityInput {
            borrower_name: None,
            profile: sample_profile(),
            thresholds: PolicyThresholds {
                max_dsr: dec!(1.5),
                max_ltv: dec!(0.95),
            },
        };
        match analyze_affordability(&input).unwrap_err() {
            KprError::InvalidInput { field, .. } => assert_eq!(field, "max_dsr"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
