//! Presentation formatting for rupiah amounts, decimals and percentages.
//!
//! Every function is defined for the whole `Decimal` range; intermediate
//! scaling that would leave the range saturates at `Decimal::MAX`/`MIN`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

#[cfg(feature = "affordability")]
use crate::affordability::{AffordabilityResult, PolicyThresholds};

/// Whole number with `,` thousands separators, rounded half-to-even
/// (`5000.4` -> `"5,000"`).
pub fn format_int(value: Decimal) -> String {
    let rounded = value.round();
    if rounded.is_zero() {
        return "0".to_string();
    }
    signed(rounded.is_sign_negative(), group_digits(&rounded.abs().to_string()))
}

/// Rupiah with thousands separators and no fraction (`"Rp5,000"`).
pub fn format_rupiah(value: Money) -> String {
    format!("Rp{}", format_int(value))
}

/// Decimal without trailing zeros: `10.0` -> `"10"`, `10.50` -> `"10.5"`.
pub fn format_decimal_trim(value: Decimal) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    value.normalize().to_string()
}

/// Trimmed decimal with separators on the integer part only:
/// `12345.6` -> `"12,345.6"`, `10000` -> `"10,000"`.
pub fn format_decimal_with_commas(value: Decimal) -> String {
    let trimmed = format_decimal_trim(value);
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.as_str()),
    };
    let grouped = match body.split_once('.') {
        Some((int_part, frac)) => format!("{}.{}", group_digits(int_part), frac),
        None => group_digits(body),
    };
    signed(negative, grouped)
}

/// A fraction shown as a whole percent: `0.6` -> `"60%"`.
pub fn format_percent(fraction: Rate) -> String {
    let pct = fraction.checked_mul(dec!(100)).unwrap_or(if fraction.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    });
    format!("{}%", format_int(pct))
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn signed(negative: bool, body: String) -> String {
    if negative {
        format!("-{body}")
    } else {
        body
    }
}

// ---------------------------------------------------------------------------
// Affordability snapshot
// ---------------------------------------------------------------------------

/// Labelled figures of the "Ringkasan Simulasi" panel, in display order.
#[cfg(feature = "affordability")]
pub fn snapshot_rows(
    thresholds: &PolicyThresholds,
    result: &AffordabilityResult,
) -> Vec<(&'static str, String)> {
    vec![
        ("Kebutuhan Pinjaman", format_rupiah(result.loan_need)),
        (
            "Angsuran / bulan (est.)",
            format_rupiah(result.estimated_monthly_payment),
        ),
        ("DSR Terpakai (est.)", format_percent(result.dsr_used)),
        ("Batas DSR", format_percent(thresholds.max_dsr)),
        ("LTV (pinjaman/harga)", format_percent(result.loan_to_value)),
        ("Batas LTV", format_percent(thresholds.max_ltv)),
        (
            "Maks. pokok pinjaman sesuai DSR",
            format_rupiah(result.max_principal_under_dsr),
        ),
        ("DP minimum", format_rupiah(result.required_down_payment)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_int() {
        assert_eq!(format_int(dec!(5000)), "5,000");
        assert_eq!(format_int(dec!(6_632_393.54)), "6,632,394");
        assert_eq!(format_int(dec!(999)), "999");
        assert_eq!(format_int(dec!(-1234567)), "-1,234,567");
        assert_eq!(format_int(dec!(-0.4)), "0");
    }

    #[test]
    fn test_format_int_half_to_even() {
        assert_eq!(format_int(dec!(2.5)), "2");
        assert_eq!(format_int(dec!(3.5)), "4");
    }

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(dec!(600_000_000)), "Rp600,000,000");
        assert_eq!(format_rupiah(Decimal::ZERO), "Rp0");
    }

    #[test]
    fn test_format_decimal_trim() {
        assert_eq!(format_decimal_trim(dec!(10.0)), "10");
        assert_eq!(format_decimal_trim(dec!(10.50)), "10.5");
        assert_eq!(format_decimal_trim(dec!(100)), "100");
        assert_eq!(format_decimal_trim(dec!(0.000)), "0");
    }

    #[test]
    fn test_format_decimal_with_commas() {
        assert_eq!(format_decimal_with_commas(dec!(12345.6)), "12,345.6");
        assert_eq!(format_decimal_with_commas(dec!(10000.0)), "10,000");
        assert_eq!(format_decimal_with_commas(dec!(-1234.50)), "-1,234.5");
        assert_eq!(format_decimal_with_commas(dec!(10.5)), "10.5");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(0.6)), "60%");
        assert_eq!(format_percent(dec!(1.2058897)), "121%");
        assert_eq!(format_percent(dec!(0.955)), "96%");
        assert_eq!(format_percent(Decimal::ZERO), "0%");
    }

    #[test]
    fn test_format_percent_saturates() {
        let shown = format_percent(Decimal::MAX);
        assert!(shown.ends_with('%'));
        assert!(shown.starts_with("79,228,162"));
    }
}
