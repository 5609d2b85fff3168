//! Monthly context builder.

use serde::{Deserialize, Serialize};
use splitbook_shared::types::{CategoryId, MemberId, Money};

use super::month::YearMonth;
use crate::ledger::{Expense, SettlementView};

/// A member's spending limit for one category in a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLimit {
    /// The budgeted category.
    pub category_id: CategoryId,
    /// Category display name.
    pub name: String,
    /// Spending limit for the month.
    pub limit: Money,
}

/// Budget versus actual for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpend {
    /// The budgeted category.
    pub category_id: CategoryId,
    /// Category display name.
    pub name: String,
    /// Spending limit for the month.
    pub limit: Money,
    /// Amount paid in this category during the month.
    pub spent: Money,
    /// Limit minus spent; negative when over budget.
    pub remaining: Money,
}

/// Everything the summarizer sees for one member and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyContext {
    /// The month covered.
    pub month: YearMonth,
    /// Total paid by the member during the month.
    pub total_spent: Money,
    /// One row per budget, in the order supplied.
    pub categories: Vec<CategorySpend>,
    /// Pending group settlements the member is part of.
    pub group_balances: Vec<SettlementView>,
}

/// Builds the monthly context for `member`.
///
/// Only expenses paid by the member and created within `month` count.
/// Spending in a category without a budget still adds to the total.
#[must_use]
pub fn build_monthly_context(
    member: MemberId,
    month: YearMonth,
    expenses: &[Expense],
    budgets: &[BudgetLimit],
    group_settlements: &[SettlementView],
) -> MonthlyContext {
    let paid: Vec<&Expense> = expenses
        .iter()
        .filter(|e| e.payer == member && month.contains(&e.created_at))
        .collect();

    let total_spent: Money = paid.iter().map(|e| e.total).sum();

    let categories = budgets
        .iter()
        .map(|budget| {
            let spent: Money = paid
                .iter()
                .filter(|e| e.category_id == Some(budget.category_id))
                .map(|e| e.total)
                .sum();
            CategorySpend {
                category_id: budget.category_id,
                name: budget.name.clone(),
                limit: budget.limit,
                spent,
                remaining: budget.limit - spent,
            }
        })
        .collect();

    let group_balances = group_settlements
        .iter()
        .filter(|s| s.from == member || s.to == member)
        .cloned()
        .collect();

    MonthlyContext {
        month,
        total_spent,
        categories,
        group_balances,
    }
}
