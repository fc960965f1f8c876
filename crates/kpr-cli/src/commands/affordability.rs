use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use kpr_core::affordability::schedule::{self, AmortizationInput};
use kpr_core::affordability::sensitivity::{self, SensitivityInput};
use kpr_core::affordability::{
    analyze_affordability, evaluate, AffordabilityInput, BorrowerProfile, PolicyThresholds,
};
use kpr_core::advisory::compliance_notice;
use kpr_core::advisory::context::borrower_display_name;
use kpr_core::display::snapshot_rows;
use kpr_core::text_input::{parse_money, parse_percent};

use crate::input;

const MAX_RATE_INPUT_PCT: Decimal = dec!(25);

/// Borrower profile as typed into a form: amounts accept `8,500,000` or
/// `8.500.000`, rates accept `10,5` or `10.5`.
#[derive(Args, Debug, Clone)]
#[command(allow_hyphen_values = true)]
pub struct ProfileArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Borrower name used in the advisory chat
    #[arg(long)]
    pub name: Option<String>,

    /// Net monthly income (Rp)
    #[arg(long)]
    pub income: Option<String>,

    /// Monthly expenses (Rp)
    #[arg(long, default_value = "0")]
    pub expenses: String,

    /// Property price (Rp)
    #[arg(long)]
    pub price: Option<String>,

    /// Down payment (Rp)
    #[arg(long, alias = "dp", default_value = "0")]
    pub down_payment: String,

    /// Loan term in years
    #[arg(long, default_value_t = 15)]
    pub term: u32,

    /// Annual interest rate in percent, clamped to 0..25
    #[arg(long, default_value = "10")]
    pub rate: String,

    /// Maximum DSR in percent of disposable income, clamped to 10..70
    #[arg(long, default_value = "60")]
    pub max_dsr: String,

    /// Maximum LTV in percent of the property price, clamped to 50..100
    #[arg(long, default_value = "95")]
    pub max_ltv: String,
}

impl ProfileArgs {
    /// Resolve the request from `--input`, piped stdin, or the flags.
    pub fn resolve(&self) -> Result<AffordabilityInput, Box<dyn std::error::Error>> {
        if let Some(request) = input::read_request(self.input.as_deref())? {
            return Ok(request);
        }
        self.from_flags()
    }

    /// Like [`ProfileArgs::resolve`] but never touches stdin, which the
    /// chat loop needs for the conversation.
    pub fn resolve_without_stdin(&self) -> Result<AffordabilityInput, Box<dyn std::error::Error>> {
        match self.input.as_deref() {
            Some(path) => input::file::read_document(path),
            None => self.from_flags(),
        }
    }

    pub fn from_flags(&self) -> Result<AffordabilityInput, Box<dyn std::error::Error>> {
        let income = self
            .income
            .as_deref()
            .ok_or("--income is required (or provide --input)")?;
        let price = self
            .price
            .as_deref()
            .ok_or("--price is required (or provide --input)")?;

        Ok(AffordabilityInput {
            borrower_name: self.name.clone(),
            profile: BorrowerProfile {
                net_monthly_income: parse_money(income),
                monthly_expenses: parse_money(&self.expenses),
                property_price: parse_money(price),
                down_payment: parse_money(&self.down_payment),
                term_years: self.term,
                annual_interest_rate_pct: parse_percent(
                    &self.rate,
                    Decimal::ZERO,
                    MAX_RATE_INPUT_PCT,
                ),
            },
            thresholds: PolicyThresholds {
                max_dsr: percent_to_fraction(&self.max_dsr, dec!(10), dec!(70)),
                max_ltv: percent_to_fraction(&self.max_ltv, dec!(50), dec!(100)),
            },
        })
    }
}

/// Typed policy percentage as a fraction, clamped to the range a bank
/// officer can pick.
fn percent_to_fraction(text: &str, min_pct: Decimal, max_pct: Decimal) -> Decimal {
    parse_percent(text, min_pct, max_pct) / dec!(100)
}

pub fn run_evaluate(args: ProfileArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = args.resolve()?;
    let result = analyze_affordability(&request)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_snapshot(args: ProfileArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = args.resolve()?;
    request.validate()?;
    Ok(snapshot_value(&request))
}

/// The summary panel as ordered label/value rows plus compliance flags.
pub fn snapshot_value(request: &AffordabilityInput) -> Value {
    let result = evaluate(&request.profile, &request.thresholds);
    let mut rows: Vec<Value> = snapshot_rows(&request.thresholds, &result)
        .into_iter()
        .map(|(label, value)| json!({ "label": label, "value": value }))
        .collect();
    rows.push(json!({ "label": "DSR", "value": mark(result.dsr_compliant) }));
    rows.push(json!({ "label": "LTV", "value": mark(result.ltv_compliant) }));

    json!({
        "borrower": borrower_display_name(request),
        "result": {
            "rows": rows,
            "eligible": result.eligible(),
            "notice": compliance_notice(&result),
        },
    })
}

fn mark(compliant: bool) -> &'static str {
    if compliant {
        "✅ Sesuai"
    } else {
        "❌ Melebihi batas"
    }
}

/// Arguments for the amortization schedule
#[derive(Args, Debug)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal (Rp)
    #[arg(long)]
    pub principal: Option<String>,

    /// Annual interest rate in percent, clamped to 0..25
    #[arg(long, default_value = "10")]
    pub rate: String,

    /// Loan term in years
    #[arg(long, default_value_t = 15)]
    pub term: u32,

    /// Only report the yearly summaries
    #[arg(long)]
    pub yearly_only: bool,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AmortizationInput = match input::read_request(args.input.as_deref())? {
        Some(request) => request,
        None => AmortizationInput {
            principal: parse_money(
                args.principal
                    .as_deref()
                    .ok_or("--principal is required (or provide --input)")?,
            ),
            annual_interest_rate_pct: parse_percent(
                &args.rate,
                Decimal::ZERO,
                MAX_RATE_INPUT_PCT,
            ),
            term_years: args.term,
        },
    };

    let mut output = schedule::build_amortization_schedule(&request)?;
    if args.yearly_only {
        output.result.rows.clear();
    }
    Ok(serde_json::to_value(output)?)
}

/// Arguments for the term / down payment grid
#[derive(Args, Debug)]
pub struct SensitivityArgs {
    /// Path to JSON/YAML input file; otherwise JSON is read from stdin
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: SensitivityInput = input::read_request(args.input.as_deref())?
        .ok_or("sensitivity needs --input or a JSON request on stdin")?;
    let output = sensitivity::analyze_sensitivity(&request)?;
    Ok(serde_json::to_value(output)?)
}
