//! Settlement matching.
//!
//! Turns net balances into pairwise transfers with a greedy two-pointer walk:
//! 1. Split members into creditors (owed money) and debtors (owing money),
//!    debts held as positive magnitudes
//! 2. Sort both lists by amount, largest first; ties keep member-id order
//! 3. Repeatedly match the current debtor with the current creditor for the
//!    smaller of the two amounts, advancing whichever side reaches zero
//!
//! The result zeroes every balance, but it is not guaranteed to use the
//! fewest possible transfers. Finding that minimum is a subset-sum style
//! search and is not attempted.

use splitbook_shared::types::{MemberId, Money};
use tracing::{debug, error};

use super::error::InvariantError;
use super::types::{NetBalances, Settlement};

/// Computes the transfers that settle every balance.
///
/// Deterministic: the same balances always give the same ordered list.
///
/// # Errors
///
/// Returns `InvariantError::ConservationViolated` if the balances do not sum
/// to zero, which leaves one side unmatched.
pub fn compute_settlements(balances: &NetBalances) -> Result<Vec<Settlement>, InvariantError> {
    let mut creditors: Vec<(MemberId, Money)> = balances
        .iter()
        .filter(|(_, amount)| amount.is_positive())
        .map(|(member, amount)| (*member, *amount))
        .collect();
    let mut debtors: Vec<(MemberId, Money)> = balances
        .iter()
        .filter(|(_, amount)| amount.is_negative())
        .map(|(member, amount)| (*member, -*amount))
        .collect();

    // sort_by is stable, so equal amounts stay in member-id order
    creditors.sort_by(|a, b| b.1.cmp(&a.1));
    debtors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut settlements = Vec::with_capacity(creditors.len() + debtors.len());
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let (debtor, owed) = &mut debtors[i];
        let (creditor, due) = &mut creditors[j];

        let pay = (*owed).min(*due);
        if pay.is_positive() {
            debug!(from = %debtor, to = %creditor, amount = %pay, "Matched settlement");
            settlements.push(Settlement {
                from: *debtor,
                to: *creditor,
                amount: pay,
            });
        }

        *owed -= pay;
        *due -= pay;

        if owed.is_zero() {
            i += 1;
        }
        if due.is_zero() {
            j += 1;
        }
    }

    let unmatched_debt: Money = debtors[i..].iter().map(|(_, amount)| *amount).sum();
    let unmatched_credit: Money = creditors[j..].iter().map(|(_, amount)| *amount).sum();

    if !unmatched_debt.is_zero() || !unmatched_credit.is_zero() {
        error!(
            %unmatched_debt,
            %unmatched_credit,
            "Net balances do not sum to zero"
        );
        return Err(InvariantError::ConservationViolated {
            unmatched_debt,
            unmatched_credit,
        });
    }

    Ok(settlements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn member(n: u128) -> MemberId {
        MemberId::from_uuid(Uuid::from_u128(n))
    }

    fn balances(entries: &[(u128, i64)]) -> NetBalances {
        entries
            .iter()
            .map(|(m, cents)| (member(*m), Money::from_cents(*cents)))
            .collect()
    }

    fn settlement(from: u128, to: u128, cents: i64) -> Settlement {
        Settlement {
            from: member(from),
            to: member(to),
            amount: Money::from_cents(cents),
        }
    }

    #[test]
    fn test_one_creditor_two_debtors() {
        // A: +500, B: -300, C: -200
        let net = balances(&[(1, 50_000), (2, -30_000), (3, -20_000)]);
        let result = compute_settlements(&net).unwrap();

        assert_eq!(
            result,
            vec![settlement(2, 1, 30_000), settlement(3, 1, 20_000)]
        );
    }

    #[test]
    fn test_partial_matches() {
        // A: +150, B: +50, C: -120, D: -80
        let net = balances(&[(1, 15_000), (2, 5_000), (3, -12_000), (4, -8_000)]);
        let result = compute_settlements(&net).unwrap();

        assert_eq!(
            result,
            vec![
                settlement(3, 1, 12_000),
                settlement(4, 1, 3_000),
                settlement(4, 2, 5_000),
            ]
        );
    }

    #[test]
    fn test_exact_match_advances_both() {
        let net = balances(&[(1, 1_000), (2, 500), (3, -1_000), (4, -500)]);
        let result = compute_settlements(&net).unwrap();

        assert_eq!(
            result,
            vec![settlement(3, 1, 1_000), settlement(4, 2, 500)]
        );
    }

    #[test]
    fn test_ties_keep_member_order() {
        let net = balances(&[(3, -100), (1, -100), (2, 200)]);
        let result = compute_settlements(&net).unwrap();

        assert_eq!(result, vec![settlement(1, 2, 100), settlement(3, 2, 100)]);
    }

    #[test]
    fn test_all_settled() {
        let net = balances(&[(1, 0), (2, 0)]);
        assert!(compute_settlements(&net).unwrap().is_empty());
        assert!(compute_settlements(&NetBalances::default()).unwrap().is_empty());
    }

    #[test]
    fn test_unbalanced_input_is_internal_error() {
        let net = balances(&[(1, 1_000), (2, -700)]);
        assert_eq!(
            compute_settlements(&net),
            Err(InvariantError::ConservationViolated {
                unmatched_debt: Money::ZERO,
                unmatched_credit: Money::from_cents(300),
            })
        );

        let net = balances(&[(1, -1_000)]);
        assert_eq!(
            compute_settlements(&net),
            Err(InvariantError::ConservationViolated {
                unmatched_debt: Money::from_cents(1_000),
                unmatched_credit: Money::ZERO,
            })
        );
    }

    #[test]
    fn test_deterministic() {
        let net = balances(&[(1, 700), (2, 300), (3, -400), (4, -400), (5, -200)]);
        assert_eq!(
            compute_settlements(&net).unwrap(),
            compute_settlements(&net).unwrap()
        );
    }
}
