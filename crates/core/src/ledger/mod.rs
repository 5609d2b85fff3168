//! Group expense ledger.
//!
//! This module implements the settlement engine:
//! - Equal and custom expense splits
//! - Net balance aggregation per member
//! - Greedy settlement matching
//! - Expense and balance workflows over repository ports

pub mod balance;
pub mod error;
pub mod service;
pub mod settlement;
pub mod split;
pub mod types;
pub mod validation;

#[cfg(test)]
mod settlement_props;
#[cfg(test)]
mod split_props;

pub use balance::{BalanceSummary, compute_net_balances, summarize_net_balances};
pub use error::{InvariantError, LedgerError};
pub use service::{
    BalanceReport, BalanceService, ExpenseService, GroupStatement, LedgerRepository, LedgerSnapshot,
    MemberDirectory, MemberProfile, NewExpense, RecordedExpense, RepositoryError, ServiceError,
    SettlementView,
};
pub use settlement::compute_settlements;
pub use split::{MIN_SPLIT_MEMBERS, compute_equal_split};
pub use types::{CustomSplitEntry, Expense, NetBalances, Settlement, Split, SplitShare};
pub use validation::validate_custom_split;
