//! Lenient parsing of amounts typed into free-text fields.
//!
//! Both parsers are total: anything that cannot be read as a number maps to
//! zero instead of an error, so a half-typed field never blocks a recompute.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::types::{Money, Percent};

/// Parse a rupiah amount. `,` and `.` are both thousands separators here,
/// so the result is always an integer amount.
///
/// `"5,000,000"`, `"5.000.000"` and `"  5 000 000 "` all give 5,000,000.
pub fn parse_money(text: &str) -> Money {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '.')
        .collect();

    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Decimal::ZERO;
    }

    match Decimal::from_str(digits) {
        Ok(value) if negative => -value,
        Ok(value) => value,
        Err(_) => Decimal::ZERO,
    }
}

/// Parse a decimal such as an interest rate.
///
/// A single `,` with no `.` is a decimal comma (`"10,5"` is 10.5); otherwise
/// commas group thousands and `.` is the decimal point (`"12,345.6"`).
pub fn parse_decimal(text: &str) -> Decimal {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();

    let normalized = if compact.matches(',').count() == 1 && !compact.contains('.') {
        compact.replace(',', ".")
    } else {
        compact.replace(',', "")
    };
    if normalized.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(&normalized)
        .or_else(|e| {
            if normalized.contains(['e', 'E']) {
                Decimal::from_scientific(&normalized)
            } else {
                Err(e)
            }
        })
        .unwrap_or(Decimal::ZERO)
}

/// [`parse_decimal`] clamped into `[min, max]`, for percentage fields.
pub fn parse_percent(text: &str, min: Percent, max: Percent) -> Percent {
    parse_decimal(text).clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_grouping_styles() {
        assert_eq!(parse_money("5,000,000"), dec!(5_000_000));
        assert_eq!(parse_money("5.000.000"), dec!(5_000_000));
        assert_eq!(parse_money("  1 234 "), dec!(1234));
        assert_eq!(parse_money("5000000"), dec!(5_000_000));
    }

    #[test]
    fn test_money_blank_and_garbage() {
        assert_eq!(parse_money(""), Decimal::ZERO);
        assert_eq!(parse_money("   "), Decimal::ZERO);
        assert_eq!(parse_money(",.,"), Decimal::ZERO);
        assert_eq!(parse_money("-"), Decimal::ZERO);
        assert_eq!(parse_money("Rp5,000"), Decimal::ZERO);
        assert_eq!(parse_money("12abc"), Decimal::ZERO);
        assert_eq!(parse_money("--5"), Decimal::ZERO);
    }

    #[test]
    fn test_money_signs() {
        assert_eq!(parse_money("-5,000"), dec!(-5000));
        assert_eq!(parse_money("+5,000"), dec!(5000));
    }

    #[test]
    fn test_money_overflow_is_zero() {
        assert_eq!(parse_money("999999999999999999999999999999999"), Decimal::ZERO);
    }

    #[test]
    fn test_decimal_comma_and_point() {
        assert_eq!(parse_decimal("10,5"), dec!(10.5));
        assert_eq!(parse_decimal("10.5"), dec!(10.5));
        assert_eq!(parse_decimal("12,345.6"), dec!(12345.6));
        assert_eq!(parse_decimal("1,234,567"), dec!(1234567));
        assert_eq!(parse_decimal(" 10 "), dec!(10));
    }

    #[test]
    fn test_decimal_garbage_is_zero() {
        assert_eq!(parse_decimal(""), Decimal::ZERO);
        assert_eq!(parse_decimal("abc"), Decimal::ZERO);
        assert_eq!(parse_decimal("1.2.3"), Decimal::ZERO);
        assert_eq!(parse_decimal("nan"), Decimal::ZERO);
    }

    #[test]
    fn test_decimal_scientific() {
        assert_eq!(parse_decimal("1.05e1"), dec!(10.5));
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(parse_percent("30", Decimal::ZERO, dec!(25)), dec!(25));
        assert_eq!(parse_percent("-2", Decimal::ZERO, dec!(25)), Decimal::ZERO);
        assert_eq!(parse_percent("7,25", Decimal::ZERO, dec!(25)), dec!(7.25));
    }
}
