//! Department OPEX overview and utilization ratios.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use potledger_shared::types::{Category, DepartmentId};

use super::types::{CategoryBreakdown, DepartmentOverview};
use crate::ledger::types::{BudgetRequestRecord, CategoryBudget, ExpenseRecord};

/// Spent as a percentage of allocated, rounded to two decimal places.
///
/// A zero allocation has no meaningful ratio and yields `None` rather than an
/// infinite or undefined number.
#[must_use]
pub fn utilization_percent(spent: Decimal, allocated: Decimal) -> Option<Decimal> {
    if allocated.is_zero() {
        return None;
    }
    spent
        .checked_div(allocated)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| percent.round_dp(2))
}

/// Builds the overview from the department's current records.
///
/// A category gets a row when it has a positive budget, an approved request
/// or any spending, so the rows always add up to the department totals.
/// Expenses with an unusable amount or date are left out, as in the ledger.
#[must_use]
pub fn overview(
    department_id: DepartmentId,
    budgets: &[CategoryBudget],
    requests: &[BudgetRequestRecord],
    expenses: &[ExpenseRecord],
) -> DepartmentOverview {
    let budgets = CategoryBudget::merge_duplicates(budgets);

    let mut spent_by_category: BTreeMap<Category, Decimal> = BTreeMap::new();
    for event in expenses.iter().filter_map(|e| e.to_event().ok()) {
        *spent_by_category.entry(event.category).or_default() += event.amount;
    }

    let allocated_of = |category: &Category| {
        budgets
            .iter()
            .find(|b| &b.category == category)
            .map_or(Decimal::ZERO, |b| b.amount)
    };

    let shown: BTreeSet<Category> = budgets
        .iter()
        .filter(|b| b.amount > Decimal::ZERO)
        .map(|b| b.category.clone())
        .chain(
            requests
                .iter()
                .filter(|r| r.status.is_approved())
                .map(BudgetRequestRecord::category),
        )
        .chain(spent_by_category.keys().cloned())
        .collect();

    let categories = shown
        .into_iter()
        .map(|category| {
            let allocated = allocated_of(&category);
            let spent = spent_by_category.get(&category).copied().unwrap_or_default();
            CategoryBreakdown {
                remaining: allocated - spent,
                utilization_percent: utilization_percent(spent, allocated),
                category,
                allocated,
                spent,
            }
        })
        .collect();

    let opex_budget: Decimal = budgets.iter().map(|b| b.amount).sum();
    let opex_used: Decimal = spent_by_category.values().copied().sum();

    DepartmentOverview {
        department_id,
        opex_budget,
        opex_used,
        opex_remaining: opex_budget - opex_used,
        utilization_percent: utilization_percent(opex_used, opex_budget),
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use potledger_shared::types::{BudgetRequestId, ExpenseId};
    use rust_decimal_macros::dec;

    use crate::workflow::RequestStatus;

    fn expense(category: &str, amount: Option<Decimal>) -> ExpenseRecord {
        ExpenseRecord {
            id: ExpenseId::new(),
            department_id: DepartmentId::new(),
            title: String::new(),
            amount,
            category: Some(category.to_string()),
            date: Some(Utc::now()),
        }
    }

    fn approved(category: &str) -> BudgetRequestRecord {
        BudgetRequestRecord {
            id: BudgetRequestId::new(),
            department_id: DepartmentId::new(),
            requester_id: None,
            title: String::new(),
            amount: Some(dec!(1)),
            category: Some(category.to_string()),
            justification: None,
            status: RequestStatus::Approved,
            created_at: Some(Utc::now()),
            approved_by: None,
            approved_at: None,
        }
    }

    #[test]
    fn test_utilization_guards_zero_denominator() {
        assert_eq!(utilization_percent(dec!(500), Decimal::ZERO), None);
        assert_eq!(utilization_percent(dec!(250), dec!(1000)), Some(dec!(25.00)));
        assert_eq!(utilization_percent(dec!(1), dec!(3)), Some(dec!(33.33)));
        assert_eq!(utilization_percent(dec!(1500), dec!(1000)), Some(dec!(150.00)));
    }

    #[test]
    fn test_department_totals() {
        let dept = DepartmentId::new();
        let budgets = vec![
            CategoryBudget::new("Logistik", dec!(10000)),
            CategoryBudget::new("Utiliti", dec!(2000)),
        ];
        let expenses = vec![
            expense("Logistik", Some(dec!(1500))),
            expense("Utiliti", Some(dec!(500))),
            expense("Utiliti", None),
        ];

        let view = overview(dept, &budgets, &[], &expenses);

        assert_eq!(view.department_id, dept);
        assert_eq!(view.opex_budget, dec!(12000));
        assert_eq!(view.opex_used, dec!(2000));
        assert_eq!(view.opex_remaining, dec!(10000));
        assert_eq!(view.utilization_percent, Some(dec!(16.67)));
        assert_eq!(view.categories.len(), 2);
        assert_eq!(view.categories[1].remaining, dec!(1500));
        assert_eq!(view.categories[1].utilization_percent, Some(dec!(25.00)));
    }

    #[test]
    fn test_category_with_request_but_no_budget_reports_undefined_utilization() {
        let view = overview(
            DepartmentId::new(),
            &[],
            &[approved("Training")],
            &[expense("Training", Some(dec!(40)))],
        );

        assert_eq!(view.categories.len(), 1);
        let training = &view.categories[0];
        assert_eq!(training.allocated, Decimal::ZERO);
        assert_eq!(training.remaining, dec!(-40));
        assert_eq!(training.utilization_percent, None);
        assert_eq!(view.utilization_percent, None);
    }

    #[test]
    fn test_zero_budget_without_requests_is_hidden() {
        let view = overview(
            DepartmentId::new(),
            &[CategoryBudget::new("Training", Decimal::ZERO)],
            &[],
            &[],
        );

        assert!(view.categories.is_empty());
    }

    #[test]
    fn test_spending_without_budget_gets_a_row() {
        let budgets = vec![CategoryBudget::new("Logistik", dec!(1000))];
        let expenses = vec![
            expense("Logistik", Some(dec!(200))),
            expense("Catering", Some(dec!(75))),
        ];

        let view = overview(DepartmentId::new(), &budgets, &[], &expenses);

        let catering = &view.categories[0];
        assert_eq!(catering.category.as_str(), "Catering");
        assert_eq!(catering.remaining, dec!(-75));
        assert_eq!(catering.utilization_percent, None);

        let spent: Decimal = view.categories.iter().map(|c| c.spent).sum();
        let remaining: Decimal = view.categories.iter().map(|c| c.remaining).sum();
        assert_eq!(spent, view.opex_used);
        assert_eq!(remaining, view.opex_remaining);
    }
}
