//! Net balance aggregation.
//!
//! Folds a group's expenses and splits into one "paid minus owed" figure per
//! member. For well-formed input the balances sum to zero: every cent paid
//! is owed by someone.

use splitbook_shared::types::{MemberId, Money};

use super::types::{Expense, NetBalances, Split};

/// Net balances plus how many splits had to be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSummary {
    /// Paid minus owed, per current member.
    pub balances: NetBalances,
    /// Splits whose owner is no longer a member of the group.
    pub skipped_splits: usize,
    /// Total owed by those skipped splits.
    pub skipped_amount: Money,
}

/// Computes net balances for the current members of a group.
///
/// Every member starts at zero so members with no activity still appear.
/// Each expense credits its payer with the total; each split debits its
/// owner with the amount owed.
///
/// Known limitation: a split owned by someone who has since left the group
/// is skipped, which understates what that member owes. The payer side is
/// always counted. Use [`summarize_net_balances`] to see how much was skipped.
#[must_use]
pub fn compute_net_balances(
    members: &[MemberId],
    expenses: &[Expense],
    splits: &[Split],
) -> NetBalances {
    summarize_net_balances(members, expenses, splits).balances
}

/// Same as [`compute_net_balances`], also reporting skipped splits.
#[must_use]
pub fn summarize_net_balances(
    members: &[MemberId],
    expenses: &[Expense],
    splits: &[Split],
) -> BalanceSummary {
    let mut balances = NetBalances::zeroed(members.iter().copied());

    for expense in expenses {
        balances.credit(expense.payer, expense.total);
    }

    let mut skipped_splits = 0;
    let mut skipped_amount = Money::ZERO;
    for split in splits {
        if !balances.debit(&split.owner, split.amount_owed) {
            skipped_splits += 1;
            skipped_amount += split.amount_owed;
        }
    }

    BalanceSummary {
        balances,
        skipped_splits,
        skipped_amount,
    }
}
