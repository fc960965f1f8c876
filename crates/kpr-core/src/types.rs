use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values (IDR). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates and ratios expressed as decimals (0.60 = 60%).
pub type Rate = Decimal;

/// Percentages as entered by a borrower (10.5 = 10.5%).
pub type Percent = Decimal;

/// Every amount handled by the engine is denominated in rupiah.
pub const CURRENCY: &str = "IDR";

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
    pub currency: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
            currency: CURRENCY.to_string(),
        },
    }
}
