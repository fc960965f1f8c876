pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use kpr_core::display::{format_percent, format_rupiah};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

const RATIO_FIELDS: [&str; 4] = ["loan_to_value", "dsr_used", "max_dsr", "max_ltv"];

const MONEY_FIELDS: [&str; 16] = [
    "loan_need",
    "estimated_monthly_payment",
    "max_principal_under_dsr",
    "disposable_income",
    "max_installment_under_dsr",
    "required_down_payment",
    "monthly_payment",
    "total_paid",
    "total_interest",
    "opening_balance",
    "payment",
    "interest",
    "principal",
    "closing_balance",
    "interest_paid",
    "principal_paid",
];

/// Render a decimal field the way the snapshot panel shows it: money as
/// rupiah, ratios as whole percentages. Anything else is left alone.
pub fn humanize(key: &str, value: &Value) -> Option<String> {
    let raw = value.as_str()?;
    let amount = Decimal::from_str(raw).ok()?;
    if MONEY_FIELDS.contains(&key) {
        Some(format_rupiah(amount))
    } else if RATIO_FIELDS.contains(&key) {
        Some(format_percent(amount))
    } else {
        None
    }
}
