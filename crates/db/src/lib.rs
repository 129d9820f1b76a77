//! Storage layer for Potledger.
//!
//! This crate provides:
//! - `MemoryStore`, an in-memory [`FinanceStore`] with per-department
//!   revisions and compare-and-swap budget writes
//! - Record maintenance (expenses, budget requests, category budgets)
//! - JSON snapshots for seeding and persisting a store
//!
//! [`FinanceStore`]: potledger_core::store::FinanceStore

pub mod error;
pub mod memory;
pub mod snapshot;

pub use error::{RepositoryError, SnapshotError};
pub use memory::{
    AmendBudgetRequestInput, CreateBudgetRequestInput, CreateExpenseInput, MemoryStore,
};
pub use snapshot::{DepartmentSnapshot, StoreSnapshot};
