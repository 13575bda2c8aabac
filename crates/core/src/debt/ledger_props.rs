//! Property-based tests for the debt ledger.
//!
//! - Total invariant: `total_amount` equals the converted unpaid subtotal after any mutation
//! - Status invariant: `paid` with a payment date exactly when every item is paid

use hornero_shared::types::UserId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::ledger::DebtLedger;
use super::types::{DebtStatus, DebtType};
use crate::currency::{round2, to_usd};
use crate::exchange::{Clock, RateOrigin, RateSnapshot};
use crate::testing::{fixed_clock, sample_debt};

/// One step applied to a debt.
#[derive(Debug, Clone)]
enum Op {
    Pay(Vec<usize>),
    Unpay(Vec<usize>),
}

fn item() -> impl Strategy<Value = (u32, Decimal)> {
    (1u32..10, 0i64..1_000_000).prop_map(|(q, cents)| (q, Decimal::new(cents, 2)))
}

fn ops(len: usize) -> impl Strategy<Value = Vec<Op>> {
    let indexes = prop::collection::vec(0..len, 1..=len);
    let op = prop_oneof![
        indexes.clone().prop_map(Op::Pay),
        indexes.prop_map(Op::Unpay),
    ];
    prop::collection::vec(op, 1..12)
}

fn debt_and_ops() -> impl Strategy<Value = (bool, Vec<(u32, Decimal)>, Vec<Op>, Decimal)> {
    (
        any::<bool>(),
        prop::collection::vec(item(), 1..6),
        (100i64..100_000).prop_map(|v| Decimal::new(v, 2)),
    )
        .prop_flat_map(|(vale, items, rate)| {
            let len = items.len();
            (Just(vale), Just(items), ops(len), Just(rate))
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_totals_and_status_stay_consistent((vale, items, ops, rate) in debt_and_ops()) {
        let clock = fixed_clock();
        let kind = if vale { DebtType::Vale } else { DebtType::Standard };
        let named: Vec<(&str, u32, Decimal)> =
            items.iter().map(|(q, amount)| ("item", *q, *amount)).collect();
        let mut debt = sample_debt(kind, &named);
        debt.exchange_rate_snapshot = Some(RateSnapshot {
            rate,
            date: clock.today(),
            source: RateOrigin::Manual,
        });
        DebtLedger::recompute_totals(&mut debt).unwrap();

        for op in ops {
            match op {
                Op::Pay(idx) => DebtLedger::mark_paid(&mut debt, &idx, UserId::new(), &clock).unwrap(),
                Op::Unpay(idx) => DebtLedger::mark_unpaid(&mut debt, &idx, &clock).unwrap(),
            }

            let unpaid: Decimal = debt
                .items
                .iter()
                .filter(|i| !i.is_paid)
                .map(|i| i.subtotal())
                .sum();
            let expected = match kind {
                DebtType::Standard => round2(unpaid),
                DebtType::Vale => to_usd(unpaid, rate).unwrap(),
            };
            prop_assert_eq!(debt.total_amount, expected);

            let all_paid = debt.items.iter().all(|i| i.is_paid);
            prop_assert_eq!(debt.status == DebtStatus::Paid, all_paid);
            prop_assert_eq!(debt.payment_date.is_some(), all_paid);
            prop_assert_eq!(DebtLedger::calculate_totals(&debt).is_fully_paid, all_paid);
        }
    }

    #[test]
    fn prop_paid_plus_unpaid_equals_original_for_standard(
        items in prop::collection::vec(item(), 1..6),
        paid_mask in prop::collection::vec(any::<bool>(), 6),
    ) {
        let named: Vec<(&str, u32, Decimal)> =
            items.iter().map(|(q, amount)| ("item", *q, *amount)).collect();
        let mut debt = sample_debt(DebtType::Standard, &named);
        for (item, paid) in debt.items.iter_mut().zip(paid_mask) {
            item.is_paid = paid;
        }

        let totals = DebtLedger::calculate_totals(&debt);
        prop_assert_eq!(totals.paid_usd + totals.unpaid_usd, totals.original_usd);
        prop_assert!(totals.payment_percentage <= 100);
    }
}
