//! Recalculation engine.
//!
//! Rederives stored category budgets from the approved-request history. Used
//! to repair drift after requests are deleted or amended post-approval
//! without the stored totals being adjusted.

use std::collections::HashMap;

use rust_decimal::Decimal;

use potledger_shared::StaleCategoryPolicy;
use potledger_shared::types::Category;

use super::types::{BudgetChange, RecalculationOutcome};
use crate::ledger::types::{BudgetRequestRecord, CategoryBudget};

/// Approved totals per category, in order of first approval.
fn approved_totals(requests: &[BudgetRequestRecord]) -> Vec<(Category, Decimal)> {
    let mut order: Vec<(Category, Decimal)> = Vec::new();
    let mut index: HashMap<Category, usize> = HashMap::new();

    for request in requests.iter().filter(|r| r.status.is_approved()) {
        let Some(amount) = request.amount.filter(|a| *a > Decimal::ZERO) else {
            continue;
        };
        let category = request.category();
        match index.get(&category) {
            Some(&at) => order[at].1 += amount,
            None => {
                index.insert(category.clone(), order.len());
                order.push((category, amount));
            }
        }
    }

    order
}

/// Computes the replacement category budgets.
///
/// Categories with approved requests get the sum of their approved amounts.
/// Stored categories with no approved request follow `policy`. Existing
/// categories keep their position and new ones are appended. The result
/// depends only on `current` and the approved requests, so applying it twice
/// changes nothing the second time. Expenses play no part.
#[must_use]
pub fn recalculate(
    current: &[CategoryBudget],
    requests: &[BudgetRequestRecord],
    policy: StaleCategoryPolicy,
) -> RecalculationOutcome {
    let current = CategoryBudget::merge_duplicates(current);
    let totals = approved_totals(requests);
    let lookup: HashMap<&Category, Decimal> = totals.iter().map(|(c, a)| (c, *a)).collect();

    let mut budgets: Vec<CategoryBudget> = current
        .iter()
        .map(|stored| {
            let amount = match (lookup.get(&stored.category), policy) {
                (Some(total), _) => *total,
                (None, StaleCategoryPolicy::Zero) => Decimal::ZERO,
                (None, StaleCategoryPolicy::Preserve) => stored.amount,
            };
            CategoryBudget::new(stored.category.clone(), amount)
        })
        .collect();

    for (category, total) in &totals {
        if !current.iter().any(|stored| &stored.category == category) {
            budgets.push(CategoryBudget::new(category.clone(), *total));
        }
    }

    let changes = budgets
        .iter()
        .filter_map(|next| {
            let previous = current
                .iter()
                .find(|stored| stored.category == next.category)
                .map(|stored| stored.amount);
            (previous != Some(next.amount)).then(|| BudgetChange {
                category: next.category.clone(),
                previous,
                current: next.amount,
            })
        })
        .collect();

    RecalculationOutcome { budgets, changes }
}
