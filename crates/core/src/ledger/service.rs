//! Expense creation and balance reporting workflows.
//!
//! The services orchestrate the pure ledger functions over data supplied by
//! repository ports. The core never touches storage itself: the storage layer
//! implements [`MemberDirectory`] and [`LedgerRepository`] and must
//! - write an expense together with all of its splits, or nothing
//! - serve each snapshot, members included, from a single consistent read

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use splitbook_shared::AppError;
use splitbook_shared::types::{CategoryId, ExpenseId, GroupId, MemberId, Money};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::balance::summarize_net_balances;
use super::error::{InvariantError, LedgerError};
use super::settlement::compute_settlements;
use super::split::compute_equal_split;
use super::types::{CustomSplitEntry, Expense, NetBalances, Settlement, Split, SplitShare};
use super::validation::validate_custom_split;

/// Errors raised by repository implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The group does not exist.
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    /// The underlying store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors raised by the ledger workflows.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was rejected.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The stored ledger is inconsistent.
    #[error(transparent)]
    Invariant(#[from] InvariantError),

    /// A repository call failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Ledger(e) => e.into(),
            ServiceError::Invariant(e) => e.into(),
            ServiceError::Repository(RepositoryError::GroupNotFound(id)) => {
                Self::NotFound(format!("group {id}"))
            }
            ServiceError::Repository(RepositoryError::Storage(msg)) => Self::Database(msg),
        }
    }
}

/// A group member as known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    /// The member ID.
    pub id: MemberId,
    /// Contact email, used for display.
    pub email: String,
}

/// Membership, expenses and splits of a group as of one point in time.
///
/// Balances need all three from the same view: a member who joins between
/// a membership read and a ledger read would have their splits skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Current members in join order.
    pub members: Vec<MemberProfile>,
    /// Expenses in the group.
    pub expenses: Vec<Expense>,
    /// Splits of those expenses.
    pub splits: Vec<Split>,
}

/// Directory of group membership.
///
/// This trait is implemented by the storage layer.
pub trait MemberDirectory: Send + Sync {
    /// Current members of a group, in join order.
    fn members(
        &self,
        group_id: GroupId,
    ) -> impl Future<Output = Result<Vec<MemberProfile>, RepositoryError>> + Send;
}

/// Append-only store of expenses and splits.
///
/// This trait is implemented by the storage layer.
pub trait LedgerRepository: Send + Sync {
    /// Reads the members, expenses and splits of a group from one
    /// consistent view.
    fn snapshot(
        &self,
        group_id: GroupId,
    ) -> impl Future<Output = Result<LedgerSnapshot, RepositoryError>> + Send;

    /// Stores an expense and its splits atomically.
    fn record_expense(
        &self,
        expense: Expense,
        splits: Vec<Split>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Input for creating a new expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    /// The group the expense belongs to.
    pub group_id: GroupId,
    /// The member who paid.
    pub payer: MemberId,
    /// Amount paid; must be positive.
    pub total: Money,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional spending category.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
}

/// A stored expense together with its splits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedExpense {
    /// The expense.
    pub expense: Expense,
    /// One split per member owing a share.
    pub splits: Vec<Split>,
}

/// Expense creation workflow.
pub struct ExpenseService<D: MemberDirectory, R: LedgerRepository> {
    directory: Arc<D>,
    ledger: Arc<R>,
}

impl<D: MemberDirectory, R: LedgerRepository> ExpenseService<D, R> {
    /// Create a new expense service.
    #[must_use]
    pub fn new(directory: Arc<D>, ledger: Arc<R>) -> Self {
        Self { directory, ledger }
    }

    /// Creates an expense split equally across the current members.
    ///
    /// Checks, in order: the total is positive, the payer is a member, the
    /// group has at least two members. Members earlier in join order absorb
    /// any leftover cents.
    pub async fn create_equal_split(
        &self,
        input: NewExpense,
    ) -> Result<RecordedExpense, ServiceError> {
        let members = self.checked_members(&input).await?;
        let shares = compute_equal_split(input.total, &members)?;
        self.record(input, members, shares).await
    }

    /// Creates an expense split by caller-supplied shares.
    ///
    /// Checks, in order: the total is positive, the payer is a member, then
    /// the custom split rules.
    pub async fn create_custom_split(
        &self,
        input: NewExpense,
        entries: &[CustomSplitEntry],
    ) -> Result<RecordedExpense, ServiceError> {
        let members = self.checked_members(&input).await?;
        let group: HashSet<MemberId> = members.iter().copied().collect();
        let shares = validate_custom_split(input.total, entries, &group)?;
        self.record(input, members, shares).await
    }

    async fn checked_members(&self, input: &NewExpense) -> Result<Vec<MemberId>, ServiceError> {
        if !input.total.is_positive() {
            return Err(LedgerError::InvalidAmount(format!(
                "expense total must be greater than zero, got {}",
                input.total
            ))
            .into());
        }

        let members: Vec<MemberId> = self
            .directory
            .members(input.group_id)
            .await?
            .into_iter()
            .map(|profile| profile.id)
            .collect();

        if !members.contains(&input.payer) {
            return Err(LedgerError::PayerNotMember(input.payer).into());
        }

        Ok(members)
    }

    async fn record(
        &self,
        input: NewExpense,
        participants: Vec<MemberId>,
        shares: Vec<SplitShare>,
    ) -> Result<RecordedExpense, ServiceError> {
        let expense = Expense {
            id: ExpenseId::new(),
            group_id: input.group_id,
            payer: input.payer,
            total: input.total,
            description: input
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            category_id: input.category_id,
            participants,
            created_at: Utc::now(),
        };
        let splits: Vec<Split> = shares
            .into_iter()
            .map(|share| share.into_split(expense.id))
            .collect();

        self.ledger
            .record_expense(expense.clone(), splits.clone())
            .await?;

        info!(
            expense_id = %expense.id,
            group_id = %expense.group_id,
            total = %expense.total,
            splits = splits.len(),
            "Expense recorded"
        );

        Ok(RecordedExpense { expense, splits })
    }
}

/// Net balances and the transfers that settle them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceReport {
    /// The group reported on.
    pub group_id: GroupId,
    /// Paid minus owed, per current member.
    pub balances: NetBalances,
    /// Transfers that zero every balance.
    pub settlements: Vec<Settlement>,
}

/// A settlement with member emails attached for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementView {
    /// The member who pays.
    pub from: MemberId,
    /// The member who receives.
    pub to: MemberId,
    /// Amount transferred.
    pub amount: Money,
    /// Email of the payer, if known.
    pub from_email: Option<String>,
    /// Email of the receiver, if known.
    pub to_email: Option<String>,
}

/// Balances and display-ready settlements for a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStatement {
    /// The group reported on.
    pub group_id: GroupId,
    /// Paid minus owed, per current member.
    pub balances: NetBalances,
    /// Transfers that zero every balance, with emails.
    pub settlements: Vec<SettlementView>,
}

/// Balance reporting workflow.
///
/// Reads everything from [`LedgerRepository::snapshot`], so membership and
/// ledger rows always come from the same view.
pub struct BalanceService<R: LedgerRepository> {
    ledger: Arc<R>,
}

impl<R: LedgerRepository> BalanceService<R> {
    /// Create a new balance service.
    #[must_use]
    pub fn new(ledger: Arc<R>) -> Self {
        Self { ledger }
    }

    /// Computes balances and settlements for a group.
    pub async fn group_report(&self, group_id: GroupId) -> Result<BalanceReport, ServiceError> {
        let (_, report) = self.report_with_profiles(group_id).await?;
        Ok(report)
    }

    /// Computes balances and settlements for a group, with member emails
    /// attached to each settlement.
    pub async fn group_statement(&self, group_id: GroupId) -> Result<GroupStatement, ServiceError> {
        let (profiles, report) = self.report_with_profiles(group_id).await?;
        let emails: HashMap<MemberId, String> =
            profiles.into_iter().map(|p| (p.id, p.email)).collect();

        let settlements = report
            .settlements
            .into_iter()
            .map(|s| SettlementView {
                from: s.from,
                to: s.to,
                amount: s.amount,
                from_email: emails.get(&s.from).cloned(),
                to_email: emails.get(&s.to).cloned(),
            })
            .collect();

        Ok(GroupStatement {
            group_id,
            balances: report.balances,
            settlements,
        })
    }

    /// Computes the settlements of a group with member emails attached.
    pub async fn group_settlements(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<SettlementView>, ServiceError> {
        Ok(self.group_statement(group_id).await?.settlements)
    }

    /// Collects the settlements involving `member` across several groups.
    pub async fn member_settlements(
        &self,
        member: MemberId,
        groups: &[GroupId],
    ) -> Result<Vec<SettlementView>, ServiceError> {
        let mut involved = Vec::new();
        for group_id in groups {
            involved.extend(
                self.group_settlements(*group_id)
                    .await?
                    .into_iter()
                    .filter(|s| s.from == member || s.to == member),
            );
        }
        Ok(involved)
    }

    async fn report_with_profiles(
        &self,
        group_id: GroupId,
    ) -> Result<(Vec<MemberProfile>, BalanceReport), ServiceError> {
        let LedgerSnapshot {
            members: profiles,
            expenses,
            splits,
        } = self.ledger.snapshot(group_id).await?;
        let members: Vec<MemberId> = profiles.iter().map(|p| p.id).collect();

        debug!(
            %group_id,
            members = members.len(),
            expenses = expenses.len(),
            splits = splits.len(),
            "Computing group balances"
        );

        let summary = summarize_net_balances(&members, &expenses, &splits);
        if summary.skipped_splits > 0 {
            warn!(
                %group_id,
                skipped_splits = summary.skipped_splits,
                skipped_amount = %summary.skipped_amount,
                "Ignoring splits owed by members who left the group"
            );
        }

        let settlements = compute_settlements(&summary.balances)?;
        info!(
            %group_id,
            settlements = settlements.len(),
            "Group balances computed"
        );

        Ok((
            profiles,
            BalanceReport {
                group_id,
                balances: summary.balances,
                settlements,
            },
        ))
    }
}
