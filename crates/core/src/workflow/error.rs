//! Workflow error types.

use thiserror::Error;

use super::types::RequestStatus;

/// Errors raised by budget request status transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// The requested transition is not allowed from the current status.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: RequestStatus,
        /// Requested status.
        to: RequestStatus,
    },
}
