use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{types::*, KprError, KprResult};

/// Longest tenor offered for a KPR.
pub const MAX_TERM_YEARS: u32 = 30;

/// Upper bound accepted for an annual interest rate, in percent.
pub const MAX_ANNUAL_RATE_PCT: Percent = dec!(100);

pub const DEFAULT_MAX_DSR: Rate = dec!(0.60);
pub const DEFAULT_MAX_LTV: Rate = dec!(0.95);

// ---------------------------------------------------------------------------
// Borrower profile
// ---------------------------------------------------------------------------

/// Financial profile of a single borrower, owned by the caller and passed
/// into every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowerProfile {
    pub net_monthly_income: Money,
    pub monthly_expenses: Money,
    pub property_price: Money,
    /// May exceed the property price; loan need is then clamped to zero.
    pub down_payment: Money,
    pub term_years: u32,
    /// Annual rate in percent (10.5 means 10.5% per year).
    pub annual_interest_rate_pct: Percent,
}

impl Default for BorrowerProfile {
    fn default() -> Self {
        Self {
            net_monthly_income: Decimal::ZERO,
            monthly_expenses: Decimal::ZERO,
            property_price: Decimal::ZERO,
            down_payment: Decimal::ZERO,
            term_years: 15,
            annual_interest_rate_pct: dec!(10),
        }
    }
}

impl BorrowerProfile {
    /// Net income left after monthly expenses. Negative when expenses
    /// exceed income.
    pub fn disposable_income(&self) -> Money {
        self.net_monthly_income
            .checked_sub(self.monthly_expenses)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn validate(&self) -> KprResult<()> {
        let money_fields = [
            ("net_monthly_income", self.net_monthly_income),
            ("monthly_expenses", self.monthly_expenses),
            ("property_price", self.property_price),
            ("down_payment", self.down_payment),
        ];
        for (field, value) in money_fields {
            if value < Decimal::ZERO {
                return Err(KprError::InvalidInput {
                    field: field.into(),
                    reason: "Amount cannot be negative.".into(),
                });
            }
        }
        if self.term_years == 0 || self.term_years > MAX_TERM_YEARS {
            return Err(KprError::InvalidInput {
                field: "term_years".into(),
                reason: format!("Term must be between 1 and {MAX_TERM_YEARS} years."),
            });
        }
        if self.annual_interest_rate_pct < Decimal::ZERO
            || self.annual_interest_rate_pct > MAX_ANNUAL_RATE_PCT
        {
            return Err(KprError::InvalidInput {
                field: "annual_interest_rate_pct".into(),
                reason: format!("Annual rate must be between 0 and {MAX_ANNUAL_RATE_PCT} percent."),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Policy thresholds
// ---------------------------------------------------------------------------

/// Lending policy limits the snapshot is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyThresholds {
    /// Maximum share of disposable income the installment may consume.
    pub max_dsr: Rate,
    /// Maximum loan-to-value ratio.
    pub max_ltv: Rate,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            max_dsr: DEFAULT_MAX_DSR,
            max_ltv: DEFAULT_MAX_LTV,
        }
    }
}

impl PolicyThresholds {
    pub fn validate(&self) -> KprResult<()> {
        for (field, value) in [("max_dsr", self.max_dsr), ("max_ltv", self.max_ltv)] {
            if value <= Decimal::ZERO || value > Decimal::ONE {
                return Err(KprError::InvalidInput {
                    field: field.into(),
                    reason: "Threshold must be a fraction in (0, 1].".into(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Request envelope
// ---------------------------------------------------------------------------

/// A complete affordability request as received from a form, file or API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AffordabilityInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrower_name: Option<String>,
    pub profile: BorrowerProfile,
    #[serde(default)]
    pub thresholds: PolicyThresholds,
}

impl AffordabilityInput {
    pub fn validate(&self) -> KprResult<()> {
        self.profile.validate()?;
        self.thresholds.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_disposable_income() {
        assert_eq!(sample_profile().disposable_income(), dec!(5_500_000));
        let mut profile = sample_profile();
        profile.monthly_expenses = dec!(9_000_000);
        assert_eq!(profile.disposable_income(), dec!(-500_000));
    }

    #[test]
    fn test_valid_profile_passes() {
        assert!(sample_profile().validate().is_ok());
        assert!(PolicyThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut profile = sample_profile();
        profile.down_payment = dec!(-1);
        match profile.validate().unwrap_err() {
            KprError::InvalidInput { field, .. } => assert_eq!(field, "down_payment"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_term_out_of_range_rejected() {
        let mut profile = sample_profile();
        profile.term_years = 0;
        assert!(profile.validate().is_err());
        profile.term_years = 31;
        assert!(profile.validate().is_err());
        profile.term_years = 30;
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_threshold_bounds() {
        let zero_dsr = PolicyThresholds {
            max_dsr: Decimal::ZERO,
            max_ltv: dec!(0.9),
        };
        assert!(zero_dsr.validate().is_err());
        let over_ltv = PolicyThresholds {
            max_dsr: dec!(0.4),
            max_ltv: dec!(1.01),
        };
        match over_ltv.validate().unwrap_err() {
            KprError::InvalidInput { field, .. } => assert_eq!(field, "max_ltv"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_input_defaults_thresholds_when_omitted() {
        let json = serde_json::json!({
            "profile": {
                "net_monthly_income": "8500000",
                "monthly_expenses": "3000000",
                "property_price": "750000000",
                "down_payment": "150000000",
                "term_years": 15,
                "annual_interest_rate_pct": "10.5"
            }
        });
        let input: AffordabilityInput = serde_json::from_value(json).unwrap();
        assert_eq!(input.thresholds, PolicyThresholds::default());
        assert_eq!(input.profile, sample_profile());
        assert!(input.borrower_name.is_none());
    }
}
