use std::{ffi::OsString, fs::File, io::Read, str::FromStr};

use ::serde::{Deserialize, Serialize, Serializer};
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{SplitError, SplitResult};
use crate::types::{Balances, Expense, MonetaryAmount, Participant, SettlementPlan, MAX_EXPENSE_AMOUNT};

const SPLIT_SEPARATOR: char = ';';

#[derive(Debug, Deserialize)]
pub struct ExpenseRowEntity {
    #[serde(alias = "paid_by", alias = "payer_name")]
    pub payer: String,
    pub amount: String,
    #[serde(default)]
    pub split_among: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ExpenseRowEntity {
    fn into_domain(self, line: u64) -> SplitResult<Expense> {
        if self.payer.is_empty() {
            return Err(SplitError::MissingPayer { line });
        }

        let amount = Decimal::from_str(&self.amount).map_err(|_| SplitError::InvalidAmount {
            line,
            value: self.amount.clone(),
        })?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(SplitError::NegativeAmount { line, amount });
        }
        if amount > MAX_EXPENSE_AMOUNT {
            return Err(SplitError::AmountTooLarge {
                line,
                amount,
                max: MAX_EXPENSE_AMOUNT,
            });
        }

        let split_among = match self.split_among.as_deref().map(str::trim) {
            None | Some("") => Vec::new(),
            Some(list) => list
                .split(SPLIT_SEPARATOR)
                .map(str::trim)
                .map(|name| {
                    if name.is_empty() {
                        Err(SplitError::EmptyParticipantName { line })
                    } else {
                        Ok(Participant::from(name))
                    }
                })
                .collect::<SplitResult<Vec<_>>>()?,
        };

        let expense = Expense::new(
            Participant::new(self.payer),
            MonetaryAmount::new(amount),
            split_among,
        );
        Ok(match self.description.filter(|d| !d.is_empty()) {
            Some(description) => expense.with_description(description),
            None => expense,
        })
    }
}

fn plain_decimal<S: Serializer>(x: &Decimal, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&x.to_string())
}

#[derive(Debug, Serialize)]
pub struct ExpenseListingEntity {
    description: String,
    payer: String,
    #[serde(serialize_with = "plain_decimal")]
    amount: Decimal,
    split_among: String,
}

impl ExpenseListingEntity {
    fn from_expense(expense: &Expense, scale: u32) -> Self {
        let split_among: Vec<&str> = expense.split_among.iter().map(Participant::name).collect();
        Self {
            description: expense.description.clone().unwrap_or_default(),
            payer: expense.payer.name().to_string(),
            amount: display_amount(expense.amount, scale),
            split_among: split_among.join(SPLIT_SEPARATOR.to_string().as_str()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BalanceRowEntity {
    participant: String,
    #[serde(serialize_with = "plain_decimal")]
    balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct SettlementRowEntity {
    from: String,
    to: String,
    #[serde(serialize_with = "plain_decimal")]
    amount: Decimal,
}

/// Rounds for display, keeping the scale fixed so `5` prints as `5.00`.
///
/// Midpoints round away from zero (`0.125` shows as `0.13`). Full precision is
/// kept everywhere else; this is the only place amounts are rounded.
pub(crate) fn display_amount(amount: MonetaryAmount, scale: u32) -> Decimal {
    let mut rounded = amount.rounded(scale);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(scale);
    rounded
}

pub fn read_expenses<R: Read>(input: R) -> SplitResult<Vec<Expense>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let mut expenses: Vec<Expense> = Vec::new();
    for record in reader.records() {
        // a half-read expense list would give wrong balances, so stop at the first bad row
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: ExpenseRowEntity = record.deserialize(Some(&headers))?;
        expenses.push(row.into_domain(line)?);
    }

    info!(expenses = expenses.len(), "read expenses");
    Ok(expenses)
}

pub fn process_csv(csv_path: &OsString) -> SplitResult<Vec<Expense>> {
    let file = File::open(csv_path)?;
    read_expenses(file)
}

fn write_rows<T: Serialize>(rows: impl Iterator<Item = T>) -> SplitResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?
    }

    wtr.flush()?;
    let inner = wtr
        .into_inner()
        .map_err(|e| SplitError::IntoInner(e.error().to_string()))?;
    Ok(String::from_utf8(inner)?)
}

/// One row per expense in input order. An empty `split_among` means everyone.
pub fn output_expenses_csv(expenses: &[Expense], scale: u32) -> SplitResult<String> {
    if expenses.is_empty() {
        return Ok(String::from("description,payer,amount,split_among\n"));
    }
    write_rows(
        expenses
            .iter()
            .map(|e| ExpenseListingEntity::from_expense(e, scale)),
    )
}

pub fn output_balances_csv(balances: &Balances, scale: u32) -> SplitResult<String> {
    if balances.is_empty() {
        return Ok(String::from("participant,balance\n"));
    }
    write_rows(balances.iter().map(|(p, b)| BalanceRowEntity {
        participant: p.name().to_string(),
        balance: display_amount(*b, scale),
    }))
}

pub fn output_settlements_csv(plan: &SettlementPlan, scale: u32) -> SplitResult<String> {
    if plan.is_empty() {
        return Ok(String::from("from,to,amount\n"));
    }
    write_rows(plan.transfers().iter().map(|s| SettlementRowEntity {
        from: s.from.name().to_string(),
        to: s.to.name().to_string(),
        amount: display_amount(s.amount, scale),
    }))
}
