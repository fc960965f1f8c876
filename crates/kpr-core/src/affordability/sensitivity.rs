use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::engine::evaluate;
use super::profile::{AffordabilityInput, MAX_TERM_YEARS};
use crate::{types::*, KprError, KprResult};

/// 2-way sweep of term length against down payment around a base profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    pub base: AffordabilityInput,
    pub term_years: Vec<u32>,
    pub down_payments: Vec<Money>,
}

/// Matrix[i][j] holds the metric for `term_years[i]` and `down_payments[j]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub term_years: Vec<u32>,
    pub down_payments: Vec<Money>,
    pub payment_matrix: Vec<Vec<Money>>,
    pub dsr_matrix: Vec<Vec<Rate>>,
    pub eligible_matrix: Vec<Vec<bool>>,
    /// Cell matching the base profile, when both of its values were swept.
    pub base_case_position: Option<(usize, usize)>,
    /// Per down payment, the shortest swept term passing both checks.
    pub shortest_eligible_term: Vec<Option<u32>>,
}

pub fn analyze_sensitivity(
    input: &SensitivityInput,
) -> KprResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.base.validate()?;
    let terms = sweep_terms(&input.term_years)?;
    let down_payments = sweep_down_payments(&input.down_payments)?;

    let mut payment_matrix = Vec::with_capacity(terms.len());
    let mut dsr_matrix = Vec::with_capacity(terms.len());
    let mut eligible_matrix = Vec::with_capacity(terms.len());

    for &term in &terms {
        let mut payments = Vec::with_capacity(down_payments.len());
        let mut dsrs = Vec::with_capacity(down_payments.len());
        let mut eligible = Vec::with_capacity(down_payments.len());
        for &dp in &down_payments {
            let mut profile = input.base.profile;
            profile.term_years = term;
            profile.down_payment = dp;
            let cell = evaluate(&profile, &input.base.thresholds);
            payments.push(cell.estimated_monthly_payment);
            dsrs.push(cell.dsr_used);
            eligible.push(cell.eligible());
        }
        payment_matrix.push(payments);
        dsr_matrix.push(dsrs);
        eligible_matrix.push(eligible);
    }

    let shortest_eligible_term: Vec<Option<u32>> = (0..down_payments.len())
        .map(|j| {
            terms
                .iter()
                .zip(&eligible_matrix)
                .find(|(_, row)| row[j])
                .map(|(term, _)| *term)
        })
        .collect();

    if shortest_eligible_term.iter().all(Option::is_none) {
        warnings.push("No swept combination satisfies both DSR and LTV limits.".into());
    }

    let base_row = terms.iter().position(|t| *t == input.base.profile.term_years);
    let base_col = down_payments
        .iter()
        .position(|dp| *dp == input.base.profile.down_payment);

    let output = SensitivityOutput {
        term_years: terms,
        down_payments,
        payment_matrix,
        dsr_matrix,
        eligible_matrix,
        base_case_position: base_row.zip(base_col),
        shortest_eligible_term,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "2-Way Sensitivity: term years x down payment",
        &serde_json::json!({
            "variable_1": "term_years",
            "variable_2": "down_payment",
            "max_dsr": input.base.thresholds.max_dsr.to_string(),
            "max_ltv": input.base.thresholds.max_ltv.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Sorted, de-duplicated terms within the offered range.
fn sweep_terms(values: &[u32]) -> KprResult<Vec<u32>> {
    if values.is_empty() {
        return Err(KprError::InvalidInput {
            field: "term_years".into(),
            reason: "At least one term is required.".into(),
        });
    }
    if let Some(bad) = values.iter().find(|t| **t == 0 || **t > MAX_TERM_YEARS) {
        return Err(KprError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Term {bad} is outside 1..={MAX_TERM_YEARS} years."),
        });
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    Ok(sorted)
}

fn sweep_down_payments(values: &[Money]) -> KprResult<Vec<Money>> {
    if values.is_empty() {
        return Err(KprError::InvalidInput {
            field: "down_payments".into(),
            reason: "At least one down payment is required.".into(),
        });
    }
    if values.iter().any(|dp| *dp < Decimal::ZERO) {
        return Err(KprError::InvalidInput {
            field: "down_payments".into(),
            reason: "Down payments cannot be negative.".into(),
        });
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    sorted.dedup();
    Ok(sorted)
}
