//! Property-based tests for Bs/USD conversion.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::{round2, to_bs, to_usd};

/// Strategy to generate bolívar amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate rates with 2 decimals (1.00 to 1,000.00).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (100i64..100_000i64).prop_map(|v| Decimal::new(v, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Converted amounts never carry more than 2 decimal places.
    #[test]
    fn prop_conversion_rounds_to_cents(amount in positive_amount(), rate in positive_rate()) {
        prop_assert!(to_usd(amount, rate).unwrap().scale() <= 2);
        prop_assert!(to_bs(amount, rate).unwrap().scale() <= 2);
    }

    /// Bs -> USD -> Bs drifts at most half a cent of USD times the rate.
    #[test]
    fn prop_bs_usd_round_trip(amount in positive_amount(), rate in positive_rate()) {
        let usd = to_usd(amount, rate).unwrap();
        let back = to_bs(usd, rate).unwrap();
        let tolerance = round2(rate * Decimal::new(5, 3)) + Decimal::new(1, 2);
        prop_assert!((back - amount).abs() <= tolerance,
            "amount={amount} rate={rate} usd={usd} back={back}");
    }

    /// USD -> Bs -> USD is exact to the cent.
    #[test]
    fn prop_usd_bs_round_trip(amount in positive_amount(), rate in positive_rate()) {
        let bs = to_bs(amount, rate).unwrap();
        let back = to_usd(bs, rate).unwrap();
        prop_assert!((back - amount).abs() <= Decimal::new(1, 2));
    }

    /// Conversion is monotonic in the amount.
    #[test]
    fn prop_to_usd_monotonic(a in positive_amount(), b in positive_amount(), rate in positive_rate()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(to_usd(lo, rate).unwrap() <= to_usd(hi, rate).unwrap());
    }
}
