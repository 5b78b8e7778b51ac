//! Property-based integration tests for FX conversion and points pricing.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::{NaiveDate, TimeZone, Utc};
use itinero_core::fx::{convert, convert_strict, FxError, FxSnapshot};
use itinero_core::points::{compute_topup, create_quote, PointsError};
use itinero_core::utils::FixedClock;
use proptest::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Generators
// =============================================================================

const CODES: [&str; 6] = ["USD", "GHS", "EUR", "KES", "GBP", "JPY"];

/// Generates a rate table covering every code in `CODES` with USD as base.
fn arb_rates() -> impl Strategy<Value = HashMap<String, f64>> {
    proptest::collection::vec(0.0001f64..10_000.0, CODES.len() - 1).prop_map(|values| {
        let mut rates: HashMap<String, f64> = CODES[1..]
            .iter()
            .zip(values)
            .map(|(c, r)| (c.to_string(), r))
            .collect();
        rates.insert("USD".to_string(), 1.0);
        rates
    })
}

fn arb_code() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(CODES.to_vec())
}

fn snapshot(rates: HashMap<String, f64>) -> FxSnapshot {
    FxSnapshot::new(
        "prop",
        "exchangerate-api",
        "USD",
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        rates,
        Utc::now(),
    )
}

// =============================================================================
// Conversion properties
// =============================================================================

proptest! {
    #[test]
    fn prop_convert_matches_rate_ratio(
        rates in arb_rates(),
        amount in -1_000_000.0f64..1_000_000.0,
        from in arb_code(),
        to in arb_code(),
    ) {
        prop_assume!(from != to);
        let expected = amount * (rates[to] / rates[from]);
        let s = snapshot(rates);
        prop_assert_eq!(convert(Some(&s), Some(amount), from, to), Some(expected));
    }

    #[test]
    fn prop_identity_conversion_is_exact(
        rates in arb_rates(),
        amount in proptest::num::f64::ANY,
        code in arb_code(),
    ) {
        let s = snapshot(rates);
        let result = convert(Some(&s), Some(amount), code, &code.to_lowercase()).unwrap();
        prop_assert_eq!(result.to_bits(), amount.to_bits());
    }

    #[test]
    fn prop_strict_and_lenient_agree(
        rates in arb_rates(),
        amount in -1_000_000.0f64..1_000_000.0,
        from in arb_code(),
        to in arb_code(),
    ) {
        let s = snapshot(rates.clone());
        let lenient = convert(Some(&s), Some(amount), from, to).unwrap();
        let strict = convert_strict(amount, from, to, &rates, "USD").unwrap();
        prop_assert_eq!(lenient.to_bits(), strict.to_bits());
    }

    #[test]
    fn prop_missing_rate_fails_both_ways(
        rates in arb_rates(),
        amount in 0.0f64..1_000.0,
        from in arb_code(),
    ) {
        prop_assume!(from != "USD");
        let mut rates = rates;
        rates.remove(from);
        let s = snapshot(rates.clone());

        prop_assert_eq!(convert(Some(&s), Some(amount), from, "USD"), None);
        prop_assert_eq!(
            convert_strict(amount, from, "USD", &rates, "USD"),
            Err(FxError::MissingRate(from.to_string()))
        );
    }
}

// =============================================================================
// Pricing properties
// =============================================================================

proptest! {
    #[test]
    fn prop_minor_agrees_with_major(
        points in 0.0001f64..1_000_000.0,
        unit_price in 0.0f64..100.0,
    ) {
        let amount = compute_topup(points, unit_price).unwrap();
        prop_assert_eq!(amount.amount_minor, (amount.amount_major * 100.0).round() as i64);
        prop_assert_eq!(amount.amount_major, (points * unit_price * 100.0).round() / 100.0);
    }

    #[test]
    fn prop_non_positive_points_are_rejected(
        points in prop_oneof![
            -1_000_000.0f64..=0.0,
            Just(f64::NAN),
            Just(f64::INFINITY),
            Just(f64::NEG_INFINITY),
        ],
    ) {
        let clock = FixedClock(Utc.with_ymd_and_hms(2025, 12, 2, 10, 0, 0).unwrap());
        let is_invalid_quantity = matches!(create_quote("user-1", points, 0.40, 15, &clock), Err(PointsError::InvalidQuantity(_)));
        prop_assert!(is_invalid_quantity);
    }
}
