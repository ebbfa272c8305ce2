use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use im::{OrdMap, OrdSet};
use rust_decimal::{Decimal, RoundingStrategy};

/// Two-decimal currency granularity. Balances closer to zero than this are settled.
pub const DEFAULT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Largest single expense accepted from input (10^15).
///
/// Balances and totals are plain `Decimal` sums, which overflow near 7.9 * 10^28.
/// With every expense at or below this cap that takes more than 10^13 expenses.
pub const MAX_EXPENSE_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

#[derive(Default, Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Debug)]
pub struct Participant(String);

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Participant {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MonetaryAmount(Decimal);

impl MonetaryAmount {
    pub const ZERO: MonetaryAmount = MonetaryAmount(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Splits the amount into `count` equal shares at full precision.
    ///
    /// Panics on a zero count: callers resolve an empty split to the full group first.
    pub fn share_of(&self, count: usize) -> Self {
        assert!(count > 0, "cannot split an expense between zero participants");
        Self(self.0 / Decimal::from(count))
    }

    pub fn is_settled(&self, tolerance: Decimal) -> bool {
        self.0.abs() < tolerance
    }

    /// Half-up rounding (midpoints away from zero), as amounts are usually shown on receipts.
    pub fn rounded(&self, scale: u32) -> Decimal {
        self.0
            .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for MonetaryAmount {
    type Output = MonetaryAmount;

    fn add(self, rhs: Self) -> Self::Output {
        MonetaryAmount(self.value() + rhs.value())
    }
}

impl AddAssign for MonetaryAmount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for MonetaryAmount {
    type Output = MonetaryAmount;

    fn sub(self, rhs: Self) -> Self::Output {
        MonetaryAmount(self.value() - rhs.value())
    }
}

impl SubAssign for MonetaryAmount {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for MonetaryAmount {
    type Output = MonetaryAmount;

    fn neg(self) -> Self::Output {
        MonetaryAmount(-self.0)
    }
}

impl std::iter::Sum for MonetaryAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(MonetaryAmount::ZERO, |acc, x| acc + x)
    }
}

/// A single shared cost as supplied by the storage layer.
///
/// Amounts are validated as non-negative before an `Expense` is built. An empty
/// `split_among` means the cost is shared by everybody known to the group at
/// evaluation time.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Expense {
    pub payer: Participant,
    pub amount: MonetaryAmount,
    pub split_among: OrdSet<Participant>,
    pub description: Option<String>,
}

impl Expense {
    pub fn new<I>(payer: Participant, amount: MonetaryAmount, split_among: I) -> Self
    where
        I: IntoIterator<Item = Participant>,
    {
        Self {
            payer,
            amount,
            split_among: split_among.into_iter().collect(),
            description: None,
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    /// Every participant this expense mentions, payer included.
    pub fn participants(&self) -> OrdSet<Participant> {
        self.split_among.update(self.payer.clone())
    }
}

/// Signed net position per participant. Positive is owed money, negative owes money.
#[derive(Default, Clone, PartialEq, Eq, Debug)]
pub struct Balances(pub OrdMap<Participant, MonetaryAmount>);

impl Balances {
    pub fn get(&self, participant: &Participant) -> Option<MonetaryAmount> {
        self.0.get(participant).copied()
    }

    pub fn total(&self) -> MonetaryAmount {
        self.0.values().copied().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Participant, &MonetaryAmount)> {
        self.0.iter()
    }

    /// Applies a transfer: the payer's debt shrinks, the receiver's credit shrinks.
    pub fn apply(&self, settlement: &Settlement) -> Self {
        let from = self.get(&settlement.from).unwrap_or_default() + settlement.amount;
        let to = self.get(&settlement.to).unwrap_or_default() - settlement.amount;
        Balances(
            self.0
                .update(settlement.from.clone(), from)
                .update(settlement.to.clone(), to),
        )
    }
}

impl FromIterator<(Participant, MonetaryAmount)> for Balances {
    fn from_iter<T: IntoIterator<Item = (Participant, MonetaryAmount)>>(iter: T) -> Self {
        Balances(iter.into_iter().collect())
    }
}

/// "`from` should pay `to` this amount".
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Settlement {
    pub from: Participant,
    pub to: Participant,
    pub amount: MonetaryAmount,
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.from, self.to, self.amount)
    }
}

/// Transfers in emission order.
#[derive(Default, Clone, PartialEq, Eq, Debug)]
pub struct SettlementPlan(pub Vec<Settlement>);

impl SettlementPlan {
    pub fn transfers(&self) -> &[Settlement] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
