mod balances;
mod config;
mod error;
mod io;
mod settlements;
mod summary;
mod types;
mod utils;

#[cfg(test)]
mod settlement_props;

use std::{ffi::OsString, fmt};

use im::OrdSet;
use tracing::info;

pub use balances::{compute_balances, resolve_participants};
pub use crate::config::EngineConfig;
pub use error::{SplitError, SplitResult};
pub use io::{output_balances_csv, output_expenses_csv, output_settlements_csv, read_expenses};
pub use settlements::{plan_settlements, plan_settlements_with_tolerance};
pub use summary::{summarize, GroupSummary};
pub use types::{
    Balances, Expense, MonetaryAmount, Participant, Settlement, SettlementPlan, DEFAULT_TOLERANCE,
    MAX_EXPENSE_AMOUNT,
};

use io::{display_amount, process_csv};

/// Everything the presentation layer shows for one group.
pub struct ExpenseReport {
    pub summary: GroupSummary,
    pub expenses_csv: String,
    pub balances_csv: String,
    pub settlements_csv: String,
    display_scale: u32,
}

impl fmt::Display for ExpenseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = self.display_scale;
        writeln!(
            f,
            "total expenses: {} ({} expenses)",
            display_amount(self.summary.total, scale),
            self.summary.expense_count
        )?;
        writeln!(
            f,
            "split per person: {} ({} people)",
            display_amount(self.summary.share_per_person, scale),
            self.summary.participant_count
        )?;
        writeln!(f)?;
        write!(f, "{}", self.expenses_csv)?;
        writeln!(f)?;
        write!(f, "{}", self.balances_csv)?;
        writeln!(f)?;
        write!(f, "{}", self.settlements_csv)
    }
}

pub fn build_report(
    members: &OrdSet<Participant>,
    expenses: &[Expense],
    config: &EngineConfig,
) -> SplitResult<ExpenseReport> {
    let balances = compute_balances(members, expenses);
    let plan = plan_settlements_with_tolerance(&balances, config.tolerance);
    info!(
        participants = balances.len(),
        transfers = plan.len(),
        "settlement planned"
    );

    Ok(ExpenseReport {
        summary: summarize(members, expenses),
        expenses_csv: output_expenses_csv(expenses, config.display_scale)?,
        balances_csv: output_balances_csv(&balances, config.display_scale)?,
        settlements_csv: output_settlements_csv(&plan, config.display_scale)?,
        display_scale: config.display_scale,
    })
}

pub fn process_expenses(
    csv_path: &OsString,
    members: &[String],
    config: &EngineConfig,
) -> SplitResult<ExpenseReport> {
    let expenses = process_csv(csv_path)?;
    let members: OrdSet<Participant> = members.iter().map(|m| Participant::new(m.as_str())).collect();

    build_report(&members, &expenses, config)
}
