//! Property-based tests for balances and settlements.
//!
//! - Conservation: net balances over well-formed expenses, split equally or
//!   by validated custom shares, sum to zero
//! - Settlement zero-sum: received minus paid equals each member's balance
//! - Determinism: the same balances always yield the same transfers
//! - Transfers are positive, never to oneself, and fewer than the members
//!   with a non-zero balance

use std::collections::HashSet;

use chrono::Utc;
use proptest::prelude::*;
use splitbook_shared::types::{ExpenseId, GroupId, MemberId, Money};
use uuid::Uuid;

use super::balance::compute_net_balances;
use super::settlement::compute_settlements;
use super::split::compute_equal_split;
use super::types::{CustomSplitEntry, Expense, NetBalances, Split, SplitShare};
use super::validation::validate_custom_split;

fn member(n: u128) -> MemberId {
    MemberId::from_uuid(Uuid::from_u128(n))
}

/// Strategy to generate balances that sum to zero across 2 to 20 members.
fn balanced_net() -> impl Strategy<Value = NetBalances> {
    prop::collection::vec(-1_000_000i64..1_000_000i64, 1..20).prop_map(|cents| {
        let closing: i64 = -cents.iter().sum::<i64>();
        cents
            .into_iter()
            .chain(std::iter::once(closing))
            .enumerate()
            .map(|(i, c)| (member(i as u128 + 1), Money::from_cents(c)))
            .collect()
    })
}

/// One expense to record: split equally, or by explicit per-member cents.
#[derive(Debug, Clone)]
enum Draft {
    Equal { payer: u128, cents: i64 },
    Custom { payer: u128, shares: Vec<i64> },
}

/// Strategy to generate an expense draft for an `n` member group.
fn draft(n: u128) -> impl Strategy<Value = Draft> {
    prop_oneof![
        (1..=n, 1i64..10_000_000i64).prop_map(|(payer, cents)| Draft::Equal { payer, cents }),
        (
            1..=n,
            prop::collection::vec(0i64..1_000_000i64, n as usize),
        )
            .prop_filter("at least one share is owed", |(_, shares)| {
                shares.iter().any(|c| *c > 0)
            })
            .prop_map(|(payer, shares)| Draft::Custom { payer, shares }),
    ]
}

/// Strategy to generate a 2 to 10 member group with up to 30 expenses.
fn ledger() -> impl Strategy<Value = (u128, Vec<Draft>)> {
    (2u128..10).prop_flat_map(|n| (Just(n), prop::collection::vec(draft(n), 0..30)))
}

fn custom_shares(members: &[MemberId], shares: &[i64]) -> (Money, Vec<SplitShare>) {
    let total = Money::from_cents(shares.iter().sum());
    let entries: Vec<CustomSplitEntry> = members
        .iter()
        .zip(shares)
        .map(|(m, c)| CustomSplitEntry::new(*m, Money::from_cents(*c).to_string()))
        .collect();
    let group: HashSet<MemberId> = members.iter().copied().collect();

    (total, validate_custom_split(total, &entries, &group).unwrap())
}

fn build_ledger(n: u128, drafts: &[Draft]) -> (Vec<MemberId>, Vec<Expense>, Vec<Split>) {
    let members: Vec<MemberId> = (1..=n).map(member).collect();
    let mut expenses = Vec::new();
    let mut splits = Vec::new();

    for draft in drafts {
        let (payer, total, shares) = match draft {
            Draft::Equal { payer, cents } => {
                let total = Money::from_cents(*cents);
                (*payer, total, compute_equal_split(total, &members).unwrap())
            }
            Draft::Custom { payer, shares } => {
                let (total, shares) = custom_shares(&members, shares);
                (*payer, total, shares)
            }
        };
        let expense = Expense {
            id: ExpenseId::new(),
            group_id: GroupId::from_uuid(Uuid::nil()),
            payer: member(payer),
            total,
            description: None,
            category_id: None,
            participants: shares.iter().map(|s| s.member).collect(),
            created_at: Utc::now(),
        };
        splits.extend(shares.into_iter().map(|share| share.into_split(expense.id)));
        expenses.push(expense);
    }

    (members, expenses, splits)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* mix of equal and custom split expenses over a fixed member
    /// set, the net balances sum to zero.
    #[test]
    fn prop_net_balances_conserve((n, drafts) in ledger()) {
        let (members, expenses, splits) = build_ledger(n, &drafts);
        let balances = compute_net_balances(&members, &expenses, &splits);

        prop_assert_eq!(balances.len(), members.len());
        prop_assert_eq!(balances.total(), Money::ZERO);
    }

    /// *For any* balanced input, each member receives minus pays exactly
    /// their balance.
    #[test]
    fn prop_settlements_zero_every_balance(net in balanced_net()) {
        let settlements = compute_settlements(&net).unwrap();

        for (member, balance) in net.iter() {
            let received: Money = settlements.iter().filter(|s| s.to == *member).map(|s| s.amount).sum();
            let paid: Money = settlements.iter().filter(|s| s.from == *member).map(|s| s.amount).sum();
            prop_assert_eq!(received - paid, *balance);
        }
    }

    /// *For any* balanced input, transfers are positive, never self-directed,
    /// and number fewer than the members with a non-zero balance.
    #[test]
    fn prop_settlements_well_formed(net in balanced_net()) {
        let settlements = compute_settlements(&net).unwrap();
        let active = net.iter().filter(|(_, b)| !b.is_zero()).count();

        for s in &settlements {
            prop_assert!(s.amount.is_positive());
            prop_assert_ne!(s.from, s.to);
        }
        prop_assert!(settlements.len() < active.max(1));
    }

    /// *For any* balances, computing settlements twice gives the same list.
    #[test]
    fn prop_settlements_deterministic(net in balanced_net()) {
        prop_assert_eq!(compute_settlements(&net), compute_settlements(&net));
    }

    /// *For any* ledger, balances computed from it settle without error.
    #[test]
    fn prop_ledger_settles_end_to_end((n, drafts) in ledger()) {
        let (members, expenses, splits) = build_ledger(n, &drafts);
        let balances = compute_net_balances(&members, &expenses, &splits);

        prop_assert!(compute_settlements(&balances).is_ok());
    }

    /// *For any* balances that do not sum to zero, matching fails loudly.
    #[test]
    fn prop_unbalanced_rejected(net in balanced_net(), drift in 1i64..10_000) {
        let mut skewed = net;
        skewed.credit(member(1), Money::from_cents(drift));

        prop_assert!(compute_settlements(&skewed).is_err());
    }
}
