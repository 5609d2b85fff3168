//! In-memory ledger store loaded from a JSON snapshot file.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard};

use anyhow::{Context, ensure};
use serde::Deserialize;
use splitbook_core::insight::{BudgetLimit, YearMonth};
use splitbook_core::ledger::{
    Expense, LedgerRepository, LedgerSnapshot, MemberDirectory, MemberProfile, RepositoryError,
    Split,
};
use splitbook_shared::types::{GroupId, MemberId};

/// Top-level layout of a snapshot file.
#[derive(Debug, Deserialize)]
pub struct SnapshotFile {
    /// Groups with their members and ledger rows.
    pub groups: Vec<GroupRecord>,
    /// Per-member monthly category budgets.
    #[serde(default)]
    pub budgets: Vec<MemberBudget>,
}

/// One group in the snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupRecord {
    /// Group ID.
    pub id: GroupId,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Current members in join order.
    pub members: Vec<MemberProfile>,
    /// Recorded expenses.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Recorded splits.
    #[serde(default)]
    pub splits: Vec<Split>,
}

/// A category budget owned by one member for one month.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberBudget {
    /// Budget owner.
    pub member: MemberId,
    /// Month the budget applies to.
    pub month: YearMonth,
    /// Category and limit.
    #[serde(flatten)]
    pub limit: BudgetLimit,
}

/// Serves the repository ports from a loaded snapshot.
pub struct SnapshotStore {
    order: Vec<(GroupId, Option<String>)>,
    groups: RwLock<HashMap<GroupId, GroupRecord>>,
    budgets: Vec<MemberBudget>,
}

impl SnapshotStore {
    /// Reads and parses a snapshot file.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        let file: SnapshotFile = serde_json::from_str(&raw)
            .with_context(|| format!("invalid snapshot {}", path.display()))?;
        Self::from_file(file)
    }

    /// Builds a store from parsed contents, rejecting repeated group IDs.
    pub fn from_file(file: SnapshotFile) -> anyhow::Result<Self> {
        let mut order = Vec::with_capacity(file.groups.len());
        let mut groups = HashMap::with_capacity(file.groups.len());

        for group in file.groups {
            ensure!(
                !groups.contains_key(&group.id),
                "group {} appears more than once in the snapshot",
                group.id
            );
            order.push((group.id, group.name.clone()));
            groups.insert(group.id, group);
        }

        Ok(Self {
            order,
            groups: RwLock::new(groups),
            budgets: file.budgets,
        })
    }

    /// Group IDs and names in file order.
    pub fn groups(&self) -> &[(GroupId, Option<String>)] {
        &self.order
    }

    /// Every expense across all groups.
    pub fn expenses(&self) -> Result<Vec<Expense>, RepositoryError> {
        let groups = self.read()?;
        Ok(self
            .order
            .iter()
            .filter_map(|(id, _)| groups.get(id))
            .flat_map(|g| g.expenses.iter().cloned())
            .collect())
    }

    /// Budgets a member set for a month.
    pub fn budgets_for(&self, member: MemberId, month: YearMonth) -> Vec<BudgetLimit> {
        self.budgets
            .iter()
            .filter(|b| b.member == member && b.month == month)
            .map(|b| b.limit.clone())
            .collect()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<GroupId, GroupRecord>>, RepositoryError> {
        self.groups
            .read()
            .map_err(|_| RepositoryError::Storage("snapshot lock poisoned".to_string()))
    }
}

impl MemberDirectory for SnapshotStore {
    async fn members(&self, group_id: GroupId) -> Result<Vec<MemberProfile>, RepositoryError> {
        self.read()?
            .get(&group_id)
            .map(|g| g.members.clone())
            .ok_or(RepositoryError::GroupNotFound(group_id))
    }
}

impl LedgerRepository for SnapshotStore {
    async fn snapshot(&self, group_id: GroupId) -> Result<LedgerSnapshot, RepositoryError> {
        self.read()?
            .get(&group_id)
            .map(|g| LedgerSnapshot {
                members: g.members.clone(),
                expenses: g.expenses.clone(),
                splits: g.splits.clone(),
            })
            .ok_or(RepositoryError::GroupNotFound(group_id))
    }

    async fn record_expense(
        &self,
        expense: Expense,
        splits: Vec<Split>,
    ) -> Result<(), RepositoryError> {
        let mut groups = self
            .groups
            .write()
            .map_err(|_| RepositoryError::Storage("snapshot lock poisoned".to_string()))?;
        let group = groups
            .get_mut(&expense.group_id)
            .ok_or(RepositoryError::GroupNotFound(expense.group_id))?;

        group.expenses.push(expense);
        group.splits.extend(splits);
        Ok(())
    }
}
