//! Display formatting for dashboard figures.
//!
//! Every function here is total: `None`, NaN and infinities map to a fixed
//! zero literal instead of propagating into the output. Values are accepted
//! as `impl Into<Option<f64>>` so callers can pass either a plain `f64` or an
//! optional one.

use num_format::{Locale, ToFormattedString};

/// Currency symbol for Philippine peso amounts.
pub const CURRENCY_SYMBOL: &str = "₱";

/// Returned by [`format_currency`] for missing or non-finite input.
pub const ZERO_CURRENCY: &str = "₱0.00";

/// Returned by [`format_percentage`] for missing or non-finite input.
pub const ZERO_PERCENTAGE: &str = "0.00%";

pub const DEFAULT_PERCENT_DECIMALS: usize = 2;
pub const DEFAULT_NUMBER_DECIMALS: usize = 0;

fn finite(value: impl Into<Option<f64>>) -> Option<f64> {
    value.into().filter(|v| v.is_finite())
}

/// Render `value` with comma thousands separators and exactly `decimals`
/// fraction digits. The sign is dropped only when the rounded value is zero.
fn grouped(value: f64, decimals: usize) -> (bool, String) {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    // u128 covers every integer part `format!` can produce for values below
    // ~3.4e38; beyond that the raw digits are used ungrouped.
    let mut out = int_part
        .parse::<u128>()
        .map_or_else(|_| int_part.to_string(), |n| n.to_formatted_string(&Locale::en));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }

    let is_zero = fixed.bytes().all(|b| b == b'0' || b == b'.');
    (value.is_sign_negative() && !is_zero, out)
}

/// Format a peso amount, e.g. `1234.5` → `"₱1,234.50"`, `-20.0` → `"-₱20.00"`.
///
/// Missing or non-finite input returns [`ZERO_CURRENCY`].
#[must_use]
pub fn format_currency(value: impl Into<Option<f64>>) -> String {
    let Some(v) = finite(value) else {
        return ZERO_CURRENCY.to_string();
    };
    let (negative, digits) = grouped(v, 2);
    if negative {
        format!("-{CURRENCY_SYMBOL}{digits}")
    } else {
        format!("{CURRENCY_SYMBOL}{digits}")
    }
}

/// Format a percentage with a fixed number of decimals, e.g. `(66.666, 2)` → `"66.67%"`.
///
/// No thousands grouping is applied. Missing or non-finite input returns
/// [`ZERO_PERCENTAGE`] regardless of `decimals`.
#[must_use]
pub fn format_percentage(value: impl Into<Option<f64>>, decimals: usize) -> String {
    match finite(value) {
        Some(v) => format!("{v:.decimals$}%"),
        None => ZERO_PERCENTAGE.to_string(),
    }
}

/// Format a plain number with thousands grouping, e.g. `(1234567.891, 1)` → `"1,234,567.9"`.
///
/// Missing or non-finite input returns `"0"`.
#[must_use]
pub fn format_number(value: impl Into<Option<f64>>, decimals: usize) -> String {
    let Some(v) = finite(value) else {
        return "0".to_string();
    };
    let (negative, digits) = grouped(v, decimals);
    if negative {
        format!("-{digits}")
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_none_is_zero_literal() {
        assert_eq!(format_currency(None), "₱0.00");
    }

    #[test]
    fn currency_nan_is_zero_literal() {
        assert_eq!(format_currency(f64::NAN), ZERO_CURRENCY);
        assert_eq!(format_currency(f64::INFINITY), ZERO_CURRENCY);
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(1_234_567.891), "₱1,234,567.89");
        assert_eq!(format_currency(0.5), "₱0.50");
        assert_eq!(format_currency(Some(1000.0)), "₱1,000.00");
    }

    #[test]
    fn currency_negative_puts_sign_before_symbol() {
        assert_eq!(format_currency(-2500.0), "-₱2,500.00");
    }

    #[test]
    fn currency_negative_rounding_to_zero_drops_sign() {
        assert_eq!(format_currency(-0.001), "₱0.00");
    }

    #[test]
    fn percentage_missing_is_zero_literal() {
        assert_eq!(format_percentage(None, DEFAULT_PERCENT_DECIMALS), "0.00%");
        assert_eq!(format_percentage(f64::NAN, 4), "0.00%");
    }

    #[test]
    fn percentage_uses_fixed_decimals() {
        assert_eq!(format_percentage(600.0 / 900.0 * 100.0, 2), "66.67%");
        assert_eq!(format_percentage(80.0, 0), "80%");
        assert_eq!(format_percentage(12.3456, 3), "12.346%");
    }

    #[test]
    fn percentage_does_not_group() {
        assert_eq!(format_percentage(12_345.0, 1), "12345.0%");
    }

    #[test]
    fn number_missing_is_zero() {
        assert_eq!(format_number(f64::NAN, DEFAULT_NUMBER_DECIMALS), "0");
        assert_eq!(format_number(None, 2), "0");
    }

    #[test]
    fn number_groups_and_rounds() {
        assert_eq!(format_number(1_234_567.891, 0), "1,234,568");
        assert_eq!(format_number(1_234_567.891, 1), "1,234,567.9");
        assert_eq!(format_number(42.0, 2), "42.00");
        assert_eq!(format_number(-9876.6, 0), "-9,877");
    }
}
