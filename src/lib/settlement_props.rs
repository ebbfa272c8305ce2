//! Property-based tests for the balance calculator and settlement planner.

use im::OrdSet;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::balances::compute_balances;
use crate::settlements::plan_settlements;
use crate::types::{Expense, MonetaryAmount, Participant, DEFAULT_TOLERANCE};

const NAMES: [&str; 6] = ["Alice", "Bob", "Carol", "Dave", "Erin", "Frank"];

/// Whole amounts from 0 to 10,000.
///
/// With at most six people every non-zero balance is then a multiple of 1/60,
/// well above the one cent tolerance, so nothing is silently dropped as settled.
fn amount() -> impl Strategy<Value = MonetaryAmount> {
    (0i64..10_000i64).prop_map(|units| MonetaryAmount::new(Decimal::from(units)))
}

fn participant() -> impl Strategy<Value = Participant> {
    (0usize..NAMES.len()).prop_map(|i| Participant::from(NAMES[i]))
}

/// Splits are sometimes empty so the "everyone" default is exercised too.
fn expense() -> impl Strategy<Value = Expense> {
    (
        participant(),
        amount(),
        prop::collection::vec(participant(), 0..=NAMES.len()),
    )
        .prop_map(|(payer, amount, split)| Expense::new(payer, amount, split))
}

fn members() -> impl Strategy<Value = OrdSet<Participant>> {
    prop::collection::vec(participant(), 0..=NAMES.len()).prop_map(|v| v.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_balances_sum_to_zero(
        members in members(),
        expenses in prop::collection::vec(expense(), 0..30),
    ) {
        let balances = compute_balances(&members, &expenses);
        prop_assert!(balances.total().is_settled(DEFAULT_TOLERANCE));
    }

    #[test]
    fn prop_settlements_clear_every_balance(
        members in members(),
        expenses in prop::collection::vec(expense(), 0..30),
    ) {
        let balances = compute_balances(&members, &expenses);
        let plan = plan_settlements(&balances);

        let settled = plan.transfers().iter().fold(balances, |acc, s| acc.apply(s));
        for (participant, balance) in settled.iter() {
            prop_assert!(
                balance.is_settled(DEFAULT_TOLERANCE),
                "{} left with {}", participant, balance
            );
        }
    }

    #[test]
    fn prop_no_transfer_overpays(
        members in members(),
        expenses in prop::collection::vec(expense(), 0..30),
    ) {
        let balances = compute_balances(&members, &expenses);
        let plan = plan_settlements(&balances);

        let mut remaining = balances;
        for s in plan.transfers() {
            let owed = remaining.get(&s.from).unwrap_or_default();
            let due = remaining.get(&s.to).unwrap_or_default();
            prop_assert!(s.amount.value() > Decimal::ZERO);
            prop_assert!(s.amount <= owed.abs());
            prop_assert!(s.amount <= due);
            remaining = remaining.apply(s);
        }
    }

    #[test]
    fn prop_balances_are_repeatable(
        members in members(),
        expenses in prop::collection::vec(expense(), 0..30),
    ) {
        prop_assert_eq!(
            compute_balances(&members, &expenses),
            compute_balances(&members, &expenses)
        );
    }

    #[test]
    fn prop_transfer_count_is_linear(
        members in members(),
        expenses in prop::collection::vec(expense(), 0..30),
    ) {
        let balances = compute_balances(&members, &expenses);
        let plan = plan_settlements(&balances);
        prop_assert!(plan.len() < balances.len().max(1));
    }
}
