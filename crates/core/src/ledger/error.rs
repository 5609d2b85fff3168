//! Ledger error types.
//!
//! Two classes live here. `LedgerError` covers malformed caller input: every
//! variant is deterministic and never worth retrying. `InvariantError` means
//! the ledger itself is inconsistent, which points at a bug upstream rather
//! than at the user.

use splitbook_shared::AppError;
use splitbook_shared::types::{MemberId, Money, MoneyError};
use thiserror::Error;

/// Input validation failures raised while splitting an expense.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Amount is not a number, or the expense total is not positive.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// An equal split needs at least two members.
    #[error("Group must have at least 2 members to split expenses, found {count}")]
    InsufficientMembers {
        /// Number of members supplied.
        count: usize,
    },

    /// A custom split was submitted without any entries.
    #[error("Custom split must have at least one entry")]
    EmptySplitList,

    /// The same member appears more than once in a custom split.
    #[error("Member {0} appears more than once in the split")]
    DuplicateMember(MemberId),

    /// A custom split entry owes a negative amount.
    #[error("Member {member} cannot owe a negative amount ({amount})")]
    NegativeAmount {
        /// The member the entry belongs to.
        member: MemberId,
        /// The quantized amount.
        amount: Money,
    },

    /// A custom split entry names someone outside the group.
    #[error("Member {0} is not in this group")]
    UnknownMember(MemberId),

    /// Custom split amounts do not add up to the expense total.
    #[error("Split amounts must sum to {expected}, got {actual}")]
    SplitSumMismatch {
        /// The expense total.
        expected: Money,
        /// The sum of the quantized split amounts.
        actual: Money,
    },

    /// The payer is not a current member of the group.
    #[error("Payer {0} is not a member of this group")]
    PayerNotMember(MemberId),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InsufficientMembers { .. } => "INSUFFICIENT_MEMBERS",
            Self::EmptySplitList => "EMPTY_SPLIT_LIST",
            Self::DuplicateMember(_) => "DUPLICATE_MEMBER",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::UnknownMember(_) => "UNKNOWN_MEMBER",
            Self::SplitSumMismatch { .. } => "SPLIT_SUM_MISMATCH",
            Self::PayerNotMember(_) => "PAYER_NOT_MEMBER",
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Every ledger error is a bad request.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        400
    }
}

impl From<MoneyError> for LedgerError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::InvalidAmount(reason) => Self::InvalidAmount(reason),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Internal consistency violations.
///
/// These are never caused by user input and must not be swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// Net balances do not sum to zero, so debts and credits cannot be matched.
    #[error(
        "Ledger is not balanced: {unmatched_debt} of debt and {unmatched_credit} of credit left unmatched"
    )]
    ConservationViolated {
        /// Debt left over once the credits ran out.
        unmatched_debt: Money,
        /// Credit left over once the debts ran out.
        unmatched_credit: Money,
    },
}

impl InvariantError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConservationViolated { .. } => "LEDGER_INCONSISTENT",
        }
    }
}

impl From<InvariantError> for AppError {
    fn from(err: InvariantError) -> Self {
        Self::Internal(err.to_string())
    }
}
