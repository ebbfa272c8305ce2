use im::OrdSet;

use crate::balances::resolve_participants;
use crate::types::{Expense, MonetaryAmount, Participant};

/// Group-wide totals shown next to the balances.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GroupSummary {
    pub total: MonetaryAmount,
    pub expense_count: usize,
    pub participant_count: usize,
    /// What everyone would pay if all costs were shared evenly. Zero for an empty group.
    pub share_per_person: MonetaryAmount,
}

pub fn summarize(members: &OrdSet<Participant>, expenses: &[Expense]) -> GroupSummary {
    let participant_count = resolve_participants(members, expenses).len();
    let total: MonetaryAmount = expenses.iter().map(|e| e.amount).sum();
    let share_per_person = if participant_count == 0 {
        MonetaryAmount::ZERO
    } else {
        total.share_of(participant_count)
    };

    GroupSummary {
        total,
        expense_count: expenses.len(),
        participant_count,
        share_per_person,
    }
}
