//! Core ledger and budget logic for Potledger.
//!
//! This crate holds the department finance rules with ZERO web or database
//! dependencies. Storage is reached only through the [`store::FinanceStore`]
//! contract.
//!
//! # Modules
//!
//! - `ledger` - Baselines, ordering, running balances and summaries
//! - `budget` - Category budget recalculation and utilization
//! - `workflow` - Budget request status transitions
//! - `store` - Storage contract consumed by the engine
//! - `service` - Store-backed orchestration of the read and recalculation paths

pub mod budget;
pub mod ledger;
pub mod service;
pub mod store;
pub mod workflow;

pub use service::{FinanceService, LedgerView, RecalculationReport};
