//! Shared types, errors, and configuration for Potledger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - The normalized `Category` key used by every ledger map
//! - Caller authorization context
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod types;

pub use auth::{AuthContext, Role};
pub use config::{AppConfig, LedgerConfig, StaleCategoryPolicy};
pub use error::AppError;
