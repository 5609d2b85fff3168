//! Ledger domain types.
//!
//! Expenses and splits are append-only: once recorded they are never edited.
//! Net balances and settlements are always derived from a snapshot of them
//! and are never stored.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use splitbook_shared::types::{CategoryId, ExpenseId, GroupId, MemberId, Money, RawAmount};

/// A shared expense paid by one member on behalf of the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// The expense ID.
    pub id: ExpenseId,
    /// The group the expense belongs to.
    pub group_id: GroupId,
    /// The member who paid.
    pub payer: MemberId,
    /// Amount paid, always positive.
    pub total: Money,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional spending category.
    pub category_id: Option<CategoryId>,
    /// Group members at the time the expense was created, in group order.
    pub participants: Vec<MemberId>,
    /// When the expense was recorded.
    pub created_at: DateTime<Utc>,
}

/// One member's share of an expense.
///
/// For a given expense the `amount_owed` of all its splits sums to the
/// expense total exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// The expense this share belongs to.
    pub expense_id: ExpenseId,
    /// The member who owes the share.
    pub owner: MemberId,
    /// Amount owed, never negative.
    pub amount_owed: Money,
}

/// A computed share, before it is attached to a stored expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitShare {
    /// The member who owes the share.
    pub member: MemberId,
    /// Amount owed.
    pub amount: Money,
}

impl SplitShare {
    /// Creates a new share.
    #[must_use]
    pub const fn new(member: MemberId, amount: Money) -> Self {
        Self { member, amount }
    }

    /// Attaches the share to an expense.
    #[must_use]
    pub const fn into_split(self, expense_id: ExpenseId) -> Split {
        Split {
            expense_id,
            owner: self.member,
            amount_owed: self.amount,
        }
    }
}

/// A caller-supplied share in a custom split, not yet quantized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSplitEntry {
    /// The member who owes the share.
    pub member: MemberId,
    /// Amount as submitted.
    pub amount: RawAmount,
}

impl CustomSplitEntry {
    /// Creates a new entry.
    pub fn new(member: MemberId, amount: impl Into<RawAmount>) -> Self {
        Self {
            member,
            amount: amount.into(),
        }
    }
}

/// A directed transfer that settles part of a debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// The member who pays.
    pub from: MemberId,
    /// The member who receives.
    pub to: MemberId,
    /// Amount transferred, always positive.
    pub amount: Money,
}

/// Per-member "paid minus owed" balances for one group.
///
/// Iteration follows member-id order, which fixes the tie-break order used
/// when matching settlements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetBalances(BTreeMap<MemberId, Money>);

impl NetBalances {
    /// Creates balances with every member at zero.
    pub fn zeroed(members: impl IntoIterator<Item = MemberId>) -> Self {
        Self(members.into_iter().map(|m| (m, Money::ZERO)).collect())
    }

    /// Returns the balance of a member, if tracked.
    #[must_use]
    pub fn get(&self, member: &MemberId) -> Option<Money> {
        self.0.get(member).copied()
    }

    /// Returns true if the member is tracked.
    #[must_use]
    pub fn contains(&self, member: &MemberId) -> bool {
        self.0.contains_key(member)
    }

    /// Adds to a member's balance, tracking the member if it was not yet.
    pub fn credit(&mut self, member: MemberId, amount: Money) {
        *self.0.entry(member).or_default() += amount;
    }

    /// Subtracts from a tracked member's balance.
    ///
    /// Returns false, leaving balances untouched, if the member is not tracked.
    pub fn debit(&mut self, member: &MemberId, amount: Money) -> bool {
        match self.0.get_mut(member) {
            Some(balance) => {
                *balance -= amount;
                true
            }
            None => false,
        }
    }

    /// Iterates balances in member-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, &Money)> {
        self.0.iter()
    }

    /// Sum of all balances. Zero for a consistent ledger.
    #[must_use]
    pub fn total(&self) -> Money {
        self.0.values().sum()
    }

    /// Number of tracked members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no members are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(MemberId, Money)> for NetBalances {
    fn from_iter<I: IntoIterator<Item = (MemberId, Money)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
