//! Ledger trace construction.
//!
//! Ties the reconciler, merger, fold and summary together into one pure
//! function of the department's current records.

use serde::Serialize;

use potledger_shared::types::Category;

use super::balance::{self, CategoryBalances};
use super::baseline;
use super::merge;
use super::summary::{self, CategorySummary};
use super::types::{
    BudgetRequestRecord, CategoryBudget, ExpenseRecord, LedgerEntry, LedgerEvent, SkippedRecord,
};

/// The fully balanced ledger of a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerTrace {
    /// Every entry in display order.
    pub entries: Vec<LedgerEntry>,
    /// Final balance per category.
    pub balances: CategoryBalances,
    /// Records excluded because their amount or date was unusable.
    pub skipped: Vec<SkippedRecord>,
}

impl LedgerTrace {
    /// Entries of one category, with the balances computed over the full
    /// trace. `None` returns every entry.
    #[must_use]
    pub fn entries_for(&self, category: Option<&Category>) -> Vec<LedgerEntry> {
        match category {
            None => self.entries.clone(),
            Some(category) => self
                .entries
                .iter()
                .filter(|entry| &entry.category == category)
                .cloned()
                .collect(),
        }
    }

    /// One row per category with its final balance.
    #[must_use]
    pub fn summary(&self) -> Vec<CategorySummary> {
        summary::summarize(&self.balances)
    }
}

/// Stateless service for building ledger traces.
pub struct LedgerService;

impl LedgerService {
    /// Builds the balanced ledger from a department's records.
    ///
    /// Only approved requests become credits. Malformed expenses and approved
    /// requests are left out and listed in `skipped`.
    #[must_use]
    pub fn build_trace(
        budgets: &[CategoryBudget],
        requests: &[BudgetRequestRecord],
        expenses: &[ExpenseRecord],
    ) -> LedgerTrace {
        let mut skipped = Vec::new();

        let credits: Vec<LedgerEvent> = requests
            .iter()
            .filter(|request| request.status.is_approved())
            .filter_map(|request| request.to_event().map_err(|s| skipped.push(s)).ok())
            .collect();

        let debits: Vec<LedgerEvent> = expenses
            .iter()
            .filter_map(|expense| expense.to_event().map_err(|s| skipped.push(s)).ok())
            .collect();

        let budgets = CategoryBudget::merge_duplicates(budgets);
        let baselines = baseline::reconcile(&budgets, &credits);
        let ordered = merge::merge(baselines, credits, debits);
        let (entries, balances) = balance::fold(ordered);

        LedgerTrace {
            entries,
            balances,
            skipped,
        }
    }
}
