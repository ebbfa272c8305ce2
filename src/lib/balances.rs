use crate::types::{Balances, Expense, MonetaryAmount, Participant};
use crate::utils::AdjustImmut;
use im::{OrdMap, OrdSet};
use tracing::debug;

/// Everyone the group knows about: explicit members, every payer and every split participant.
pub fn resolve_participants(members: &OrdSet<Participant>, expenses: &[Expense]) -> OrdSet<Participant> {
    expenses
        .iter()
        .fold(members.clone(), |acc, expense| acc.union(expense.participants()))
}

fn apply_expense(
    balances: OrdMap<Participant, MonetaryAmount>,
    expense: &Expense,
    everyone: &OrdSet<Participant>,
) -> OrdMap<Participant, MonetaryAmount> {
    let split_with = if expense.split_among.is_empty() {
        everyone
    } else {
        &expense.split_among
    };
    let share = expense.amount.share_of(split_with.len());

    let credited = balances.adjust_or_default(expense.payer.clone(), |b| b + expense.amount);
    split_with
        .iter()
        .fold(credited, |acc, p| acc.adjust_or_default(p.clone(), |b| b - share))
}

/// Net balance per participant after every expense, at full precision.
pub fn compute_balances(participants: &OrdSet<Participant>, expenses: &[Expense]) -> Balances {
    let everyone = resolve_participants(participants, expenses);
    debug!(
        participants = everyone.len(),
        expenses = expenses.len(),
        "computing balances"
    );

    let init: OrdMap<Participant, MonetaryAmount> = everyone
        .iter()
        .map(|p| (p.clone(), MonetaryAmount::ZERO))
        .collect();

    Balances(
        expenses
            .iter()
            .fold(init, |acc, expense| apply_expense(acc, expense, &everyone)),
    )
}
