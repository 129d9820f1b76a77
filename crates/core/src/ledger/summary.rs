//! "All categories" summary view.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use potledger_shared::types::Category;

use super::balance::CategoryBalances;

/// Final balance of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    /// Category name.
    pub category: Category,
    /// Balance after the category's last ledger entry.
    pub final_balance: Decimal,
}

/// Projects the fold's final totals into one row per category, sorted by
/// category name.
#[must_use]
pub fn summarize(balances: &CategoryBalances) -> Vec<CategorySummary> {
    balances
        .iter()
        .map(|(category, final_balance)| CategorySummary {
            category: category.clone(),
            final_balance,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use potledger_shared::types::ExpenseId;
    use rust_decimal_macros::dec;

    use crate::ledger::types::{EntryOrigin, EntryType, LedgerEvent, RecordRef};

    fn credit(category: &str, amount: Decimal) -> LedgerEvent {
        LedgerEvent {
            origin: EntryOrigin::Persisted(RecordRef::Expense(ExpenseId::new())),
            category: Category::new(category),
            title: String::new(),
            entry_type: EntryType::Credit,
            amount,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_summary_is_sorted_by_category() {
        let mut balances = CategoryBalances::new();
        balances.apply(&credit("Utiliti", dec!(50)));
        balances.apply(&credit("Kitchen Supply", dec!(10)));
        balances.apply(&credit("Logistik", dec!(20)));

        let rows = summarize(&balances);
        let names: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();

        assert_eq!(names, vec!["Kitchen Supply", "Logistik", "Utiliti"]);
        assert_eq!(rows[2].final_balance, dec!(50));
    }

    #[test]
    fn test_empty_summary() {
        assert!(summarize(&CategoryBalances::new()).is_empty());
    }
}
