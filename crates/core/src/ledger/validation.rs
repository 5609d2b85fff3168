//! Business rule validation for custom splits.
//!
//! Rules are checked one at a time across all entries, in this order, and
//! the first violation wins:
//! 1. at least one entry
//! 2. no member appears twice
//! 3. every amount quantizes to a non-negative value
//! 4. every member belongs to the group
//! 5. the quantized amounts sum to the expense total exactly

use std::collections::HashSet;

use splitbook_shared::types::{MemberId, Money};

use super::error::LedgerError;
use super::types::{CustomSplitEntry, SplitShare};

/// Validates caller-supplied shares for an expense and quantizes them.
///
/// Pure: nothing is persisted. The returned shares keep the entry order.
///
/// # Errors
///
/// Returns the first `LedgerError` rule violation found.
pub fn validate_custom_split(
    total: Money,
    entries: &[CustomSplitEntry],
    group_members: &HashSet<MemberId>,
) -> Result<Vec<SplitShare>, LedgerError> {
    if entries.is_empty() {
        return Err(LedgerError::EmptySplitList);
    }

    let mut seen = HashSet::with_capacity(entries.len());
    if let Some(duplicate) = entries.iter().find(|e| !seen.insert(e.member)) {
        return Err(LedgerError::DuplicateMember(duplicate.member));
    }

    let shares = entries
        .iter()
        .map(|entry| {
            let amount = Money::quantize(&entry.amount)?;
            if amount.is_negative() {
                return Err(LedgerError::NegativeAmount {
                    member: entry.member,
                    amount,
                });
            }
            Ok(SplitShare::new(entry.member, amount))
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    if let Some(stranger) = shares.iter().find(|s| !group_members.contains(&s.member)) {
        return Err(LedgerError::UnknownMember(stranger.member));
    }

    let actual = Money::checked_sum(shares.iter().map(|s| s.amount)).ok_or_else(|| {
        LedgerError::InvalidAmount("split amounts overflow when summed".to_string())
    })?;
    if actual != total {
        return Err(LedgerError::SplitSumMismatch {
            expected: total,
            actual,
        });
    }

    Ok(shares)
}
