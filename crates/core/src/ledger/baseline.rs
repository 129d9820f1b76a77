//! Baseline allocation reconciler.
//!
//! A category's stored budget can exceed what its approved requests explain
//! (opening allocations, manual admin edits). The gap is shown as one
//! synthetic credit per category so that the ledger opens at the right
//! balance.

use std::collections::HashMap;

use rust_decimal::Decimal;

use potledger_shared::types::Category;

use super::types::{CategoryBudget, EntryOrigin, EntryType, LedgerEvent, baseline_date};

/// Sums approved-request credits per category.
#[must_use]
pub fn credited_by_category<'a>(
    credits: impl IntoIterator<Item = &'a LedgerEvent>,
) -> HashMap<Category, Decimal> {
    let mut sums: HashMap<Category, Decimal> = HashMap::new();
    for event in credits {
        if event.entry_type == EntryType::Credit && event.origin != EntryOrigin::Synthetic {
            *sums.entry(event.category.clone()).or_default() += event.amount;
        }
    }
    sums
}

/// Amount of the baseline needed to explain `allocated` given `credited`.
///
/// Never negative: a category whose requests already cover its budget gets
/// no baseline at all.
#[must_use]
pub fn baseline_amount(allocated: Decimal, credited: Decimal) -> Decimal {
    (allocated - credited).max(Decimal::ZERO)
}

/// Emits the baseline credits for a department.
///
/// `credits` are the validated approved-request events. Output follows the
/// order of `budgets`; categories with no budget entry get no baseline.
#[must_use]
pub fn reconcile(budgets: &[CategoryBudget], credits: &[LedgerEvent]) -> Vec<LedgerEvent> {
    let credited = credited_by_category(credits);

    budgets
        .iter()
        .filter_map(|budget| {
            let ledger_sum = credited.get(&budget.category).copied().unwrap_or_default();
            let amount = baseline_amount(budget.amount, ledger_sum);
            (amount > Decimal::ZERO).then(|| LedgerEvent {
                origin: EntryOrigin::Synthetic,
                category: budget.category.clone(),
                title: format!("Baseline Allocation ({})", budget.category),
                entry_type: EntryType::Credit,
                amount,
                date: baseline_date(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use potledger_shared::types::BudgetRequestId;
    use rust_decimal_macros::dec;

    use crate::ledger::types::RecordRef;

    fn credit(category: &str, amount: Decimal) -> LedgerEvent {
        LedgerEvent {
            origin: EntryOrigin::Persisted(RecordRef::BudgetRequest(BudgetRequestId::new())),
            category: Category::new(category),
            title: "Request".to_string(),
            entry_type: EntryType::Credit,
            amount,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_baseline_covers_gap() {
        let budgets = vec![CategoryBudget::new("Logistik", dec!(10000))];
        let credits = vec![credit("Logistik", dec!(4000))];

        let baselines = reconcile(&budgets, &credits);

        assert_eq!(baselines.len(), 1);
        let baseline = &baselines[0];
        assert_eq!(baseline.amount, dec!(6000));
        assert_eq!(baseline.origin, EntryOrigin::Synthetic);
        assert_eq!(baseline.entry_type, EntryType::Credit);
        assert_eq!(baseline.date, baseline_date());
        assert_eq!(baseline.title, "Baseline Allocation (Logistik)");
    }

    #[test]
    fn test_no_baseline_when_requests_exceed_budget() {
        let budgets = vec![CategoryBudget::new("Travel", dec!(5000))];
        let credits = vec![credit("Travel", dec!(2500)), credit("Travel", dec!(3500))];

        assert!(reconcile(&budgets, &credits).is_empty());
    }

    #[test]
    fn test_no_baseline_when_requests_match_budget() {
        let budgets = vec![CategoryBudget::new("Travel", dec!(5000))];
        let credits = vec![credit("Travel", dec!(5000))];

        assert!(reconcile(&budgets, &credits).is_empty());
    }

    #[test]
    fn test_unbudgeted_categories_get_no_baseline() {
        let budgets = vec![CategoryBudget::new("Utiliti", dec!(300))];
        let credits = vec![credit("Training", dec!(900))];

        let baselines = reconcile(&budgets, &credits);

        assert_eq!(baselines.len(), 1);
        assert_eq!(baselines[0].category.as_str(), "Utiliti");
        assert_eq!(baselines[0].amount, dec!(300));
    }

    #[test]
    fn test_categories_match_after_normalization() {
        let budgets = vec![CategoryBudget::new(" Logistik ", dec!(1000))];
        let credits = vec![credit("Logistik  ", dec!(400))];

        let baselines = reconcile(&budgets, &credits);
        assert_eq!(baselines[0].amount, dec!(600));
    }

    #[test]
    fn test_baseline_amount_is_clamped() {
        assert_eq!(baseline_amount(dec!(100), dec!(40)), dec!(60));
        assert_eq!(baseline_amount(dec!(100), dec!(140)), Decimal::ZERO);
    }
}
