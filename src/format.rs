//! Display formatting for numeric results
//!
//! Two renderings exist: [`format_number`] is the human-facing one
//! (thousands separators, at most 8 fractional digits) and
//! [`format_canonical`] is the machine one used to reseed the expression
//! buffer after `=`, chosen so that re-evaluating it returns the exact
//! same value.

/// Render a value for display.
///
/// Trims to at most 8 fractional digits, strips trailing zeros and a
/// trailing decimal point, then groups the integer part with thousands
/// separators. Total: non-finite input renders as `"0"`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let mut fixed = format!("{value:.8}");
    if fixed.contains('.') {
        fixed = fixed
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
    }

    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let negative = int_part.starts_with('-');
    let digits = int_part.trim_start_matches('-');

    // Rounding a tiny magnitude to 8 digits can leave "-0"
    if digits.chars().all(|c| c == '0') && frac_part.is_none() {
        return "0".to_string();
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(digits));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Canonical decimal string of a result, used to restart the expression
/// after `=`. Rust's shortest-roundtrip float formatting guarantees that
/// evaluating the canonical form returns the same value; non-finite values
/// canonicalize to `"0"`.
pub fn format_canonical(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    format!("{value}")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(format_number(1_234_567.890000001), "1,234,567.89");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(1_000_000.0), "1,000,000");
    }

    #[test]
    fn test_trailing_zeros_stripped() {
        assert_eq!(format_number(1.50), "1.5");
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(0.125), "0.125");
    }

    #[test]
    fn test_eight_digit_limit() {
        assert_eq!(format_number(0.123456789), "0.12345679");
        assert_eq!(format_number(1.0 + 1e-12), "1");
    }

    #[test]
    fn test_zero_and_non_finite() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "0");
        assert_eq!(format_number(f64::INFINITY), "0");
        assert_eq!(format_number(f64::NEG_INFINITY), "0");
    }

    #[test]
    fn test_negative_values() {
        assert_eq!(format_number(-1234.5), "-1,234.5");
        assert_eq!(format_number(-0.25), "-0.25");
        // Rounds to zero at 8 digits
        assert_eq!(format_number(-1e-10), "0");
    }

    #[test]
    fn test_canonical_roundtrip() {
        for v in [0.0, 1.5, -3.25, 1.0 / 3.0, 31.205, 1e15, -0.1] {
            let canon = format_canonical(v);
            assert_eq!(crate::eval::evaluate(&canon).unwrap(), v, "canon {canon:?}");
        }
    }

    #[test]
    fn test_canonical_non_finite_is_zero() {
        assert_eq!(format_canonical(f64::NAN), "0");
        assert_eq!(format_canonical(f64::INFINITY), "0");
    }
}
