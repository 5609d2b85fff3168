//! Equal split of an expense across group members.
//!
//! The total is floored to the cent per member, then the leftover cents are
//! handed out one each to the first members in the given order:
//! 1. `base = floor(total / n)` to the cent
//! 2. `remainder = total - base * n`, always fewer than `n` cents
//! 3. The first `remainder` members owe `base + 0.01`, the rest owe `base`
//!
//! The result always sums to the total exactly. Who absorbs the odd pennies
//! depends only on member order; there is no rotation across expenses.

use splitbook_shared::types::{MemberId, Money};

use super::error::LedgerError;
use super::types::SplitShare;

/// Minimum number of members an expense can be split across.
pub const MIN_SPLIT_MEMBERS: usize = 2;

/// Splits `total` evenly across `members`.
///
/// # Example
///
/// ```
/// use splitbook_core::ledger::compute_equal_split;
/// use splitbook_shared::types::{MemberId, Money};
///
/// let members = [MemberId::new(), MemberId::new(), MemberId::new()];
/// let shares = compute_equal_split(Money::from_cents(10_000), &members).unwrap();
///
/// // 100.00 / 3 = [33.34, 33.33, 33.33]
/// assert_eq!(shares[0].amount, Money::from_cents(3_334));
/// assert_eq!(shares.iter().map(|s| s.amount).sum::<Money>(), Money::from_cents(10_000));
/// ```
///
/// # Errors
///
/// Returns `InvalidAmount` if `total` is not positive and
/// `InsufficientMembers` if fewer than two members are given.
pub fn compute_equal_split(
    total: Money,
    members: &[MemberId],
) -> Result<Vec<SplitShare>, LedgerError> {
    if !total.is_positive() {
        return Err(LedgerError::InvalidAmount(format!(
            "expense total must be greater than zero, got {total}"
        )));
    }
    if members.len() < MIN_SPLIT_MEMBERS {
        return Err(LedgerError::InsufficientMembers {
            count: members.len(),
        });
    }

    // Cannot fail: members is non-empty here
    let (base, remainder) = total
        .split_even(members.len())
        .ok_or(LedgerError::InsufficientMembers {
            count: members.len(),
        })?;

    Ok(members
        .iter()
        .enumerate()
        .map(|(i, member)| {
            let amount = if i < remainder { base + Money::CENT } else { base };
            SplitShare::new(*member, amount)
        })
        .collect())
}
