//! Category-scoped OPEX ledger.
//!
//! This module builds the department ledger shown to users:
//! - Baseline reconciliation against stored category budgets
//! - Merging of baselines, approved requests and expenses into display order
//! - Per-category running balances
//! - The one-row-per-category summary

pub mod balance;
pub mod baseline;
pub mod error;
pub mod merge;
pub mod service;
pub mod summary;
pub mod types;

#[cfg(test)]
mod props;

pub use balance::CategoryBalances;
pub use error::LedgerError;
pub use service::{LedgerService, LedgerTrace};
pub use summary::CategorySummary;
pub use types::{
    BudgetRequestRecord, CategoryBudget, EntryOrigin, EntryType, ExpenseRecord, LedgerEntry,
    LedgerEvent, MalformedReason, RecordRef, SkippedRecord,
};
