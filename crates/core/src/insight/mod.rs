//! Monthly spending context.
//!
//! Assembles the pure data an external summarizer consumes: what a member
//! paid in a month, how that compares with their category budgets, and the
//! group settlements they are part of. Nothing here interprets the numbers.

pub mod context;
pub mod month;

pub use context::{BudgetLimit, CategorySpend, MonthlyContext, build_monthly_context};
pub use month::{InsightError, YearMonth};
