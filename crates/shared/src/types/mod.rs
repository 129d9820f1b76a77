//! Common types used across the application.

pub mod category;
pub mod id;

pub use category::Category;
pub use id::*;
