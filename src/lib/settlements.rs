use std::cmp::{min, Ordering};

use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

use crate::types::{Balances, MonetaryAmount, Participant, Settlement, SettlementPlan, DEFAULT_TOLERANCE};

struct Position {
    participant: Participant,
    outstanding: MonetaryAmount,
}

fn by_amount_then_name(a: &Position, b: &Position) -> Ordering {
    a.outstanding
        .cmp(&b.outstanding)
        .then_with(|| a.participant.cmp(&b.participant))
}

/// Most negative first.
fn debtors(balances: &Balances, tolerance: Decimal) -> Vec<Position> {
    let mut debtors: Vec<Position> = balances
        .iter()
        .filter(|(_, b)| b.value() < -tolerance)
        .map(|(p, b)| Position {
            participant: p.clone(),
            outstanding: *b,
        })
        .collect();
    debtors.sort_by(by_amount_then_name);
    debtors
}

/// Most positive first.
fn creditors(balances: &Balances, tolerance: Decimal) -> Vec<Position> {
    let mut creditors: Vec<Position> = balances
        .iter()
        .filter(|(_, b)| b.value() > tolerance)
        .map(|(p, b)| Position {
            participant: p.clone(),
            outstanding: *b,
        })
        .collect();
    creditors.sort_by(|a, b| {
        b.outstanding
            .cmp(&a.outstanding)
            .then_with(|| a.participant.cmp(&b.participant))
    });
    creditors
}

/// Two-pointer sweep over sorted debtors and creditors. A side that reaches
/// exactly zero is always advanced, so the sweep terminates for any tolerance.
fn sweep(mut debtors: Vec<Position>, mut creditors: Vec<Position>, tolerance: Decimal) -> Vec<Settlement> {
    let mut transfers = Vec::with_capacity(debtors.len() + creditors.len());
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];

        let amount = min(debtor.outstanding.abs(), creditor.outstanding);
        let settlement = Settlement {
            from: debtor.participant.clone(),
            to: creditor.participant.clone(),
            amount,
        };
        trace!(%settlement, "matched");
        transfers.push(settlement);

        debtor.outstanding += amount;
        creditor.outstanding -= amount;

        if debtor.outstanding.is_settled(tolerance) || debtor.outstanding.value().is_zero() {
            i += 1;
        }
        if creditor.outstanding.value() < tolerance || creditor.outstanding.value().is_zero() {
            j += 1;
        }
    }

    let residue: MonetaryAmount = debtors[i..]
        .iter()
        .chain(creditors[j..].iter())
        .map(|p| p.outstanding)
        .sum();
    if !residue.is_settled(tolerance) {
        warn!(%residue, "balances do not sum to zero, unmatched amount left unsettled");
    }

    transfers
}

/// Greedy largest-first matching of debtors to creditors.
///
/// Every creditor receives its balance and every debtor pays its balance, with
/// no transfer larger than either side's remaining amount. Balances within
/// `tolerance` of zero count as settled. Input that does not sum to zero leaves
/// the unmatched residue in place rather than failing.
///
/// `tolerance` must be positive; `EngineConfig` rejects anything else.
pub fn plan_settlements_with_tolerance(balances: &Balances, tolerance: Decimal) -> SettlementPlan {
    debug_assert!(tolerance > Decimal::ZERO, "settlement tolerance must be positive");
    let debtors = debtors(balances, tolerance);
    let creditors = creditors(balances, tolerance);
    debug!(
        debtors = debtors.len(),
        creditors = creditors.len(),
        "planning settlements"
    );

    SettlementPlan(sweep(debtors, creditors, tolerance))
}

pub fn plan_settlements(balances: &Balances) -> SettlementPlan {
    plan_settlements_with_tolerance(balances, DEFAULT_TOLERANCE)
}
