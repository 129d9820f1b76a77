//! JSON snapshots of a whole store.

use std::path::Path;

use serde::{Deserialize, Serialize};

use potledger_core::ledger::types::{BudgetRequestRecord, CategoryBudget, ExpenseRecord};
use potledger_shared::types::DepartmentId;

use crate::error::SnapshotError;

/// Every department of a store, as written to disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Departments in creation order.
    #[serde(default)]
    pub departments: Vec<DepartmentSnapshot>,
}

/// One department and its records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentSnapshot {
    /// Department ID.
    pub id: DepartmentId,
    /// Display name.
    pub name: String,
    /// Revision at the time of the snapshot.
    #[serde(default)]
    pub revision: u64,
    /// Stored category budgets.
    #[serde(default)]
    pub category_budgets: Vec<CategoryBudget>,
    /// Budget requests in creation order.
    #[serde(default)]
    pub budget_requests: Vec<BudgetRequestRecord>,
    /// Expenses in creation order.
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
}

impl DepartmentSnapshot {
    /// An empty department.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DepartmentId::new(),
            name: name.into(),
            revision: 0,
            category_budgets: Vec::new(),
            budget_requests: Vec::new(),
            expenses: Vec::new(),
        }
    }
}

impl StoreSnapshot {
    /// Reads a snapshot file.
    pub async fn read_from(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes the snapshot as pretty-printed JSON, creating parent
    /// directories as needed.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }
}
