//! Core business logic for Splitbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage is reached only through the repository traits in [`ledger::service`].
//!
//! # Modules
//!
//! - `ledger` - Expense splitting, net balances and settlement matching
//! - `insight` - Monthly spending context for external summaries

pub mod insight;
pub mod ledger;
