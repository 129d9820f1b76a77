//! Budget data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use potledger_shared::types::{Category, DepartmentId};

use crate::ledger::types::CategoryBudget;

/// One category whose stored amount changed during recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetChange {
    /// Category name.
    pub category: Category,
    /// Stored amount before, `None` if the category was new.
    pub previous: Option<Decimal>,
    /// Stored amount after.
    pub current: Decimal,
}

/// Result of rederiving category budgets from approved requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecalculationOutcome {
    /// The full replacement set of category budgets.
    pub budgets: Vec<CategoryBudget>,
    /// Categories whose amount differs from what was stored.
    pub changes: Vec<BudgetChange>,
}

impl RecalculationOutcome {
    /// True when the stored budgets already matched.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Allocation and spend of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// Category name.
    pub category: Category,
    /// Stored budget.
    pub allocated: Decimal,
    /// Sum of expenses.
    pub spent: Decimal,
    /// Allocated minus spent.
    pub remaining: Decimal,
    /// Spent as a percentage of allocated; `None` when nothing is allocated.
    pub utilization_percent: Option<Decimal>,
}

/// OPEX position of a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentOverview {
    /// Department ID.
    pub department_id: DepartmentId,
    /// Sum of category budgets.
    pub opex_budget: Decimal,
    /// Sum of expenses included in the ledger.
    pub opex_used: Decimal,
    /// Budget minus used.
    pub opex_remaining: Decimal,
    /// Used as a percentage of budget; `None` when the budget is zero.
    pub utilization_percent: Option<Decimal>,
    /// Categories with an allocation or an approved request, in name order.
    pub categories: Vec<CategoryBreakdown>,
}
