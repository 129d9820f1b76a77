//! Workflow domain types for budget request lifecycle management.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::WorkflowError;

/// Budget request status in the approval workflow.
///
/// The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Request awaits a decision.
    #[default]
    Pending,
    /// Request was approved; its amount is credited to the category.
    Approved,
    /// Request was rejected.
    Rejected,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true once a decision has been made.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Returns true if the request counts as a ledger credit.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Approve a pending request.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` unless the request is pending.
    pub const fn approve(self) -> Result<Self, WorkflowError> {
        self.transition_to(Self::Approved)
    }

    /// Reject a pending request.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` unless the request is pending.
    pub const fn reject(self) -> Result<Self, WorkflowError> {
        self.transition_to(Self::Rejected)
    }

    const fn transition_to(self, to: Self) -> Result<Self, WorkflowError> {
        match self {
            Self::Pending => Ok(to),
            from => Err(WorkflowError::InvalidTransition { from, to }),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
