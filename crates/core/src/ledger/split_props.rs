//! Property-based tests for splitting expenses.
//!
//! - Split completeness: equal shares always sum to the total
//! - Penny placement: exactly the first `remainder` members get the extra cent
//! - Custom split acceptance: any non-negative partition of the total validates

use std::collections::HashSet;

use proptest::prelude::*;
use splitbook_shared::types::{MemberId, Money};
use uuid::Uuid;

use super::error::LedgerError;
use super::split::compute_equal_split;
use super::types::CustomSplitEntry;
use super::validation::validate_custom_split;

/// Strategy to generate positive totals (0.01 to 1,000,000.00).
fn positive_total() -> impl Strategy<Value = Money> {
    (1i64..100_000_000i64).prop_map(Money::from_cents)
}

/// Strategy to generate a group of 2 to 50 distinct members.
fn member_list() -> impl Strategy<Value = Vec<MemberId>> {
    (2u128..50).prop_map(|n| (1..=n).map(|i| MemberId::from_uuid(Uuid::from_u128(i))).collect())
}

/// Strategy to generate a list of non-negative shares (0.00 to 10,000.00).
fn share_cents() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..1_000_000i64, 1..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* positive total and at least two members, the shares sum to
    /// the total exactly.
    #[test]
    fn prop_equal_split_sums_to_total(
        total in positive_total(),
        members in member_list(),
    ) {
        let shares = compute_equal_split(total, &members).unwrap();

        prop_assert_eq!(shares.len(), members.len());
        prop_assert_eq!(shares.iter().map(|s| s.amount).sum::<Money>(), total);
    }

    /// *For any* split, the members owing `base + 0.01` are exactly the first
    /// `remainder` members, and everyone else owes `base`.
    #[test]
    fn prop_pennies_go_to_first_members(
        total in positive_total(),
        members in member_list(),
    ) {
        let (base, remainder) = total.split_even(members.len()).unwrap();
        let shares = compute_equal_split(total, &members).unwrap();

        for (i, (share, member)) in shares.iter().zip(&members).enumerate() {
            prop_assert_eq!(share.member, *member);
            let expected = if i < remainder { base + Money::CENT } else { base };
            prop_assert_eq!(share.amount, expected);
            prop_assert!(share.amount >= base);
        }
        prop_assert_eq!(
            shares.iter().filter(|s| s.amount > base).count(),
            remainder
        );
    }

    /// *For any* non-negative partition of a total across distinct members of
    /// the group, validation accepts it and returns it unchanged.
    #[test]
    fn prop_custom_partition_accepted(cents in share_cents()) {
        let members: Vec<MemberId> = (1..=cents.len() as u128)
            .map(|i| MemberId::from_uuid(Uuid::from_u128(i)))
            .collect();
        let group: HashSet<MemberId> = members.iter().copied().collect();
        let entries: Vec<CustomSplitEntry> = members
            .iter()
            .zip(&cents)
            .map(|(m, c)| CustomSplitEntry::new(*m, Money::from_cents(*c)))
            .collect();
        let total = Money::from_cents(cents.iter().sum());

        prop_assume!(total.is_positive());
        let shares = validate_custom_split(total, &entries, &group).unwrap();

        prop_assert_eq!(shares.iter().map(|s| s.amount).sum::<Money>(), total);
    }

    /// *For any* partition that is off by at least a cent, validation reports
    /// the expected and actual sums.
    #[test]
    fn prop_custom_mismatch_reported(cents in share_cents(), delta in 1i64..10_000) {
        let members: Vec<MemberId> = (1..=cents.len() as u128)
            .map(|i| MemberId::from_uuid(Uuid::from_u128(i)))
            .collect();
        let group: HashSet<MemberId> = members.iter().copied().collect();
        let entries: Vec<CustomSplitEntry> = members
            .iter()
            .zip(&cents)
            .map(|(m, c)| CustomSplitEntry::new(*m, Money::from_cents(*c)))
            .collect();
        let actual = Money::from_cents(cents.iter().sum());
        let expected = actual + Money::from_cents(delta);

        prop_assert_eq!(
            validate_custom_split(expected, &entries, &group),
            Err(LedgerError::SplitSumMismatch { expected, actual })
        );
    }
}
