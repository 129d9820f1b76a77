//! Storage layer error types.

use rust_decimal::Decimal;
use thiserror::Error;

use potledger_core::ledger::RecordRef;
use potledger_core::store::StoreError;
use potledger_core::workflow::{RequestStatus, WorkflowError};
use potledger_shared::AppError;
use potledger_shared::types::BudgetRequestId;

/// Errors raised by record maintenance operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Store-level failure, including unknown departments.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No such expense or budget request in the department.
    #[error("Record not found: {0:?}")]
    RecordNotFound(RecordRef),

    /// Expense and request amounts must be strictly positive.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Category budgets cannot go below zero.
    #[error("Category budget cannot be negative, got {0}")]
    NegativeBudget(Decimal),

    /// The request is not in a state that allows the operation.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Only an admin may edit a request once it has been decided.
    #[error("Request {request_id} is already {status}")]
    DecidedRequest {
        /// The request being edited.
        request_id: BudgetRequestId,
        /// Its current status.
        status: RequestStatus,
    },
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match &err {
            RepositoryError::Store(StoreError::DepartmentNotFound(_))
            | RepositoryError::RecordNotFound(_) => Self::NotFound(err.to_string()),
            RepositoryError::Store(StoreError::RevisionConflict { .. }) => {
                Self::Conflict(err.to_string())
            }
            RepositoryError::Store(StoreError::Backend(_)) => Self::Storage(err.to_string()),
            RepositoryError::NonPositiveAmount(_) | RepositoryError::NegativeBudget(_) => {
                Self::Validation(err.to_string())
            }
            RepositoryError::Workflow(_) => Self::BusinessRule(err.to_string()),
            RepositoryError::DecidedRequest { .. } => Self::Forbidden(err.to_string()),
        }
    }
}

/// Errors raised while reading or writing a snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Filesystem failure.
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid snapshot.
    #[error("Snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use potledger_shared::types::{DepartmentId, ExpenseId};

    #[test]
    fn test_app_error_mapping() {
        let missing: AppError =
            RepositoryError::Store(StoreError::DepartmentNotFound(DepartmentId::new())).into();
        assert!(matches!(missing, AppError::NotFound(_)));

        let record: AppError = RepositoryError::RecordNotFound(RecordRef::Expense(ExpenseId::new())).into();
        assert!(matches!(record, AppError::NotFound(_)));

        let amount: AppError = RepositoryError::NonPositiveAmount(Decimal::ZERO).into();
        assert!(matches!(amount, AppError::Validation(_)));

        let workflow: AppError = RepositoryError::Workflow(WorkflowError::InvalidTransition {
            from: RequestStatus::Rejected,
            to: RequestStatus::Approved,
        })
        .into();
        assert!(matches!(workflow, AppError::BusinessRule(_)));

        let decided: AppError = RepositoryError::DecidedRequest {
            request_id: BudgetRequestId::new(),
            status: RequestStatus::Rejected,
        }
        .into();
        assert!(matches!(decided, AppError::Forbidden(_)));
    }
}
