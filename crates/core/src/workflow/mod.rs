//! Budget request approval workflow.
//!
//! Budget requests move from `pending` to either `approved` or `rejected`.
//! Both outcomes are terminal; there is no way back to `pending`.

pub mod error;
pub mod types;

pub use error::WorkflowError;
pub use types::RequestStatus;
