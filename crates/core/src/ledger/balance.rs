//! Per-category running balances.
//!
//! The fold is computed once over the merged stream, before any view-level
//! filtering, so the balance recorded against an entry is the same in the
//! "All" view and in a single-category view.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use potledger_shared::types::Category;

use super::types::{LedgerEntry, LedgerEvent};

/// Running total per category.
///
/// Every category starts at zero; the baseline entry supplies the opening
/// balance, not the stored budget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryBalances(BTreeMap<Category, Decimal>);

impl CategoryBalances {
    /// Creates an empty set of balances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event and returns the category's new balance.
    pub fn apply(&mut self, event: &LedgerEvent) -> Decimal {
        let total = self.0.entry(event.category.clone()).or_default();
        *total += event.entry_type.signed(event.amount);
        *total
    }

    /// Current balance of a category, if it has seen any entry.
    #[must_use]
    pub fn get(&self, category: &Category) -> Option<Decimal> {
        self.0.get(category).copied()
    }

    /// Balances in category-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, Decimal)> {
        self.0.iter().map(|(category, balance)| (category, *balance))
    }

    /// Sum of every category balance.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.0.values().copied().sum()
    }

    /// Number of categories tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no category has been touched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Walks ordered events, annotating each with its category's balance after
/// it is applied.
#[must_use]
pub fn fold(events: Vec<LedgerEvent>) -> (Vec<LedgerEntry>, CategoryBalances) {
    let mut balances = CategoryBalances::new();

    let entries = events
        .into_iter()
        .map(|event| {
            let running_balance = balances.apply(&event);
            LedgerEntry {
                amount: event.entry_type.signed(event.amount),
                category: event.category,
                title: event.title,
                entry_type: event.entry_type,
                date: event.date,
                origin: event.origin,
                running_balance,
            }
        })
        .collect();

    (entries, balances)
}
