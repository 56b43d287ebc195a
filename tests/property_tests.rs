//! Property-based tests for the evaluator, converter, and formatter

use fxcalc::eval::evaluate;
use fxcalc::format::{format_canonical, format_number};
use fxcalc::rates::RateTable;
use proptest::prelude::*;

fn table_with(usd: f64, jpy: f64) -> RateTable {
    RateTable::from_entries(vec![("USD".to_string(), usd), ("JPY".to_string(), jpy)]).unwrap()
}

proptest! {
    /// Re-evaluating the canonical string of a value returns that value
    /// exactly, which is what makes repeated '=' presses idempotent.
    #[test]
    fn canonical_form_roundtrips(v in -1.0e12f64..1.0e12) {
        let canon = format_canonical(v);
        prop_assert_eq!(evaluate(&canon).unwrap(), v);
    }

    /// Additive chains evaluate left to right like a plain fold
    #[test]
    fn additive_chain_matches_fold(terms in prop::collection::vec((0u32..10_000, prop::bool::ANY), 1..20)) {
        let mut expr = terms[0].0.to_string();
        let mut expected = terms[0].0 as f64;
        for (n, add) in &terms[1..] {
            expr.push(if *add { '+' } else { '-' });
            expr.push_str(&n.to_string());
            if *add {
                expected += *n as f64;
            } else {
                expected -= *n as f64;
            }
        }
        prop_assert_eq!(evaluate(&expr).unwrap(), expected);
    }

    /// Multiplication binds tighter than addition
    #[test]
    fn precedence_holds(a in 1u32..1000, b in 1u32..1000, c in 1u32..1000) {
        let flat = evaluate(&format!("{a}+{b}*{c}")).unwrap();
        prop_assert_eq!(flat, a as f64 + (b as f64 * c as f64));

        let grouped = evaluate(&format!("({a}+{b})*{c}")).unwrap();
        prop_assert_eq!(grouped, (a as f64 + b as f64) * c as f64);
    }

    /// Division by any nonzero literal never reports DivisionByZero
    #[test]
    fn nonzero_division_succeeds(a in 1u32..10_000, b in 1u32..10_000) {
        let v = evaluate(&format!("{a}/{b}")).unwrap();
        prop_assert!((v - a as f64 / b as f64).abs() < 1e-12);
    }

    /// Converting there and back lands on the original amount
    #[test]
    fn convert_roundtrip(
        amount in -1.0e9f64..1.0e9,
        usd in 0.001f64..10_000.0,
        jpy in 0.001f64..10_000.0,
    ) {
        let table = table_with(usd, jpy);
        let there = table.convert(amount, "USD", "JPY").unwrap();
        let back = table.convert(there, "JPY", "USD").unwrap();
        let tolerance = amount.abs().max(1.0) * 1e-9;
        prop_assert!((back - amount).abs() <= tolerance);
    }

    /// Base-to-base conversion is the exact identity
    #[test]
    fn base_to_base_is_identity(amount in -1.0e12f64..1.0e12) {
        let table = table_with(31.2, 0.22);
        prop_assert_eq!(table.convert(amount, "TWD", "TWD").unwrap(), amount);
    }

    /// The formatter is total and never emits an empty string
    #[test]
    fn format_number_is_total(v in prop::num::f64::ANY) {
        let s = format_number(v);
        prop_assert!(!s.is_empty());
        if !v.is_finite() {
            prop_assert_eq!(s, "0");
        }
    }

    /// Grouping only ever inserts commas; digits survive unchanged
    #[test]
    fn format_number_preserves_digits(n in 0u64..1_000_000_000_000) {
        let s = format_number(n as f64);
        let stripped: String = s.chars().filter(|c| *c != ',').collect();
        prop_assert_eq!(stripped, n.to_string());
    }
}
