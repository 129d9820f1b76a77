//! Ledger error types.
//!
//! Malformed source records are not errors: they are skipped and reported on
//! the trace. Everything here aborts the operation and is returned to the
//! caller as a typed result.

use potledger_shared::{AppError, Role, types::DepartmentId};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur while building ledgers or recalculating budgets.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The department has no category budget store entry.
    #[error("Department not found: {0}")]
    MissingDepartment(DepartmentId),

    /// The caller's role may not perform the operation.
    #[error("Role {role} is not allowed to {action}")]
    Forbidden {
        /// Caller's role.
        role: Role,
        /// Attempted action.
        action: &'static str,
    },

    /// Concurrent writes kept invalidating the recalculation snapshot.
    #[error("Recalculation for department {department_id} conflicted with concurrent writes after {attempts} attempts")]
    RecalculationConflict {
        /// Department being recalculated.
        department_id: DepartmentId,
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// A storage round-trip exceeded its deadline.
    #[error("Storage operation {operation} timed out")]
    Timeout {
        /// Store operation that timed out.
        operation: &'static str,
    },

    /// The store failed.
    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DepartmentNotFound(id) => Self::MissingDepartment(id),
            other => Self::Store(other),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match &err {
            LedgerError::MissingDepartment(_) => Self::NotFound(err.to_string()),
            LedgerError::Forbidden { .. } => Self::Forbidden(err.to_string()),
            LedgerError::RecalculationConflict { .. } => Self::Conflict(err.to_string()),
            LedgerError::Timeout { .. } => Self::Timeout(err.to_string()),
            LedgerError::Store(_) => Self::Storage(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_department_from_store() {
        let id = DepartmentId::new();
        let err = LedgerError::from(StoreError::DepartmentNotFound(id));
        assert!(matches!(err, LedgerError::MissingDepartment(found) if found == id));
    }

    #[test]
    fn test_app_error_mapping() {
        let id = DepartmentId::new();
        assert_eq!(AppError::from(LedgerError::MissingDepartment(id)).status_code(), 404);
        assert_eq!(
            AppError::from(LedgerError::Forbidden {
                role: Role::Staff,
                action: "recalculate budgets"
            })
            .status_code(),
            403
        );
        assert_eq!(
            AppError::from(LedgerError::RecalculationConflict {
                department_id: id,
                attempts: 4
            })
            .status_code(),
            409
        );
        assert_eq!(
            AppError::from(LedgerError::Timeout { operation: "list_expenses" }).status_code(),
            503
        );
        assert_eq!(
            AppError::from(LedgerError::Store(StoreError::Backend("disk full".into()))).status_code(),
            500
        );
    }
}
