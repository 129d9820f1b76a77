//! Contract of the storage collaborator.
//!
//! The ledger engine does not own persistence. It reads expenses, budget
//! requests and category budgets through [`FinanceStore`] and writes category
//! budgets back with an optimistic revision check.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use potledger_shared::types::DepartmentId;

use crate::ledger::types::{BudgetRequestRecord, CategoryBudget, ExpenseRecord};

/// A value read together with the department revision it was read at.
///
/// The revision increases on every write to any of the department's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    /// Department revision at read time.
    pub revision: u64,
    /// The value.
    pub value: T,
}

impl<T> Versioned<T> {
    /// Wraps a value with its revision.
    #[must_use]
    pub const fn new(revision: u64, value: T) -> Self {
        Self { revision, value }
    }
}

/// Errors reported by a store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No such department.
    #[error("Department not found: {0}")]
    DepartmentNotFound(DepartmentId),

    /// The department changed since the snapshot the write was based on.
    #[error("Revision conflict: expected {expected}, found {actual}")]
    RevisionConflict {
        /// Revision the caller read.
        expected: u64,
        /// Current revision.
        actual: u64,
    },

    /// Any other backend failure.
    #[error("Backend failure: {0}")]
    Backend(String),
}

/// Storage operations the ledger engine depends on.
///
/// Listings return records in creation order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FinanceStore: Send + Sync {
    /// All expenses of a department.
    async fn list_expenses(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<ExpenseRecord>, StoreError>;

    /// All budget requests of a department, whatever their status.
    async fn list_budget_requests(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<BudgetRequestRecord>, StoreError>;

    /// Stored category budgets and the revision they were read at.
    async fn get_category_budgets(
        &self,
        department_id: DepartmentId,
    ) -> Result<Versioned<Vec<CategoryBudget>>, StoreError>;

    /// Replaces every category budget of a department in one write.
    ///
    /// Fails with `RevisionConflict`, writing nothing, when the department
    /// revision is no longer `expected_revision`. Returns the new revision.
    async fn set_category_budgets(
        &self,
        department_id: DepartmentId,
        budgets: Vec<CategoryBudget>,
        expected_revision: u64,
    ) -> Result<u64, StoreError>;
}
