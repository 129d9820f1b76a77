//! Category budget maintenance.
//!
//! - `recalculation` rebuilds stored category budgets from approved requests
//! - `overview` reports allocation, spend and utilization per category

pub mod overview;
pub mod recalculation;
pub mod types;


pub use overview::{overview, utilization_percent};
pub use recalculation::recalculate;
pub use types::{BudgetChange, CategoryBreakdown, DepartmentOverview, RecalculationOutcome};
