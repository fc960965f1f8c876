use kpr_core::display::{format_decimal_with_commas, format_int, format_rupiah};
use kpr_core::text_input::{parse_decimal, parse_money};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Render `digits` with `sep` inserted every three digits from the right.
fn grouped(digits: &str, sep: char) -> String {
    let len = digits.len();
    digits
        .chars()
        .enumerate()
        .flat_map(|(i, ch)| {
            let needs_sep = i > 0 && (len - i) % 3 == 0;
            needs_sep.then_some(sep).into_iter().chain(std::iter::once(ch))
        })
        .collect()
}

// ===========================================================================
// parse_money
// ===========================================================================

#[test]
fn test_money_recovers_integers_under_any_grouping() {
    let amounts: [u64; 7] = [
        0,
        7,
        1_000,
        85_000,
        8_500_000,
        750_000_000,
        12_345_678_901_234,
    ];
    for amount in amounts {
        let digits = amount.to_string();
        let expected = Decimal::from(amount);
        for sep in [',', '.'] {
            assert_eq!(parse_money(&grouped(&digits, sep)), expected);
        }
        // Mixed separators and irregular spacing are still grouping only
        let mixed: String = grouped(&digits, ',')
            .chars()
            .enumerate()
            .map(|(i, c)| if c == ',' && i % 2 == 0 { '.' } else { c })
            .collect();
        assert_eq!(parse_money(&format!("  {mixed} ")), expected);
        assert_eq!(parse_money(&digits), expected);
    }
}

#[test]
fn test_money_accepts_its_own_display_format() {
    for amount in [dec!(0), dec!(5_000), dec!(600_000_000), dec!(6_632_394)] {
        assert_eq!(parse_money(&format_int(amount)), amount);
    }
}

#[test]
fn test_money_never_fails() {
    let inputs = ["", "Rp", "—", "1e6", "١٢٣", "5,000.00.00x", "\t\n", "+", "++1"];
    for text in inputs {
        let _ = parse_money(text);
    }
    assert_eq!(parse_money("1e6"), Decimal::ZERO);
}

// ===========================================================================
// parse_decimal
// ===========================================================================

#[test]
fn test_decimal_examples() {
    assert_eq!(parse_decimal("10,5"), dec!(10.5));
    assert_eq!(parse_decimal("12,345.6"), dec!(12345.6));
    assert_eq!(parse_decimal("10.5"), dec!(10.5));
}

#[test]
fn test_decimal_idempotent_on_canonical_output() {
    let inputs = [
        "10,5",
        "12,345.6",
        "10.5",
        "0",
        "-3,25",
        "1,234,567.891",
        "7.000",
        "garbage",
        "",
        "2.5e-3",
    ];
    for text in inputs {
        let first = parse_decimal(text);
        assert_eq!(parse_decimal(&first.to_string()), first, "input {text:?}");
    }
}

#[test]
fn test_decimal_reads_display_format() {
    for value in [dec!(10.5), dec!(12345.6), dec!(1234567), dec!(0.25)] {
        assert_eq!(parse_decimal(&format_decimal_with_commas(value)), value);
    }
}

#[test]
fn test_rupiah_prefix_is_not_a_number() {
    assert_eq!(parse_money(&format_rupiah(dec!(5_000))), Decimal::ZERO);
}
