//! Property-based tests for the ledger trace.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use potledger_shared::types::{BudgetRequestId, Category, DepartmentId, ExpenseId};

use super::service::LedgerService;
use super::types::{BudgetRequestRecord, CategoryBudget, EntryType, ExpenseRecord};
use crate::workflow::RequestStatus;

const CATEGORIES: [&str; 4] = ["Logistik", "Utiliti", "Travel", "Kitchen Supply"];

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..5_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn category_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(CATEGORIES.to_vec())
}

/// A timestamp within a two-week window, at hour granularity.
fn date_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (1u32..15, 0u32..24).prop_map(|(d, h)| Utc.with_ymd_and_hms(2025, 4, d, h, 0, 0).unwrap())
}

fn status_strategy() -> impl Strategy<Value = RequestStatus> {
    prop_oneof![
        3 => Just(RequestStatus::Approved),
        1 => Just(RequestStatus::Pending),
        1 => Just(RequestStatus::Rejected),
    ]
}

fn request_strategy() -> impl Strategy<Value = BudgetRequestRecord> {
    (category_strategy(), amount_strategy(), status_strategy(), date_strategy()).prop_map(
        |(category, amount, status, created_at)| BudgetRequestRecord {
            id: BudgetRequestId::new(),
            department_id: DepartmentId::new(),
            requester_id: None,
            title: String::new(),
            amount: Some(amount),
            category: Some(category.to_string()),
            justification: None,
            status,
            created_at: Some(created_at),
            approved_by: None,
            approved_at: None,
        },
    )
}

fn expense_strategy() -> impl Strategy<Value = ExpenseRecord> {
    (category_strategy(), amount_strategy(), date_strategy()).prop_map(|(category, amount, date)| {
        ExpenseRecord {
            id: ExpenseId::new(),
            department_id: DepartmentId::new(),
            title: String::new(),
            amount: Some(amount),
            category: Some(category.to_string()),
            date: Some(date),
        }
    })
}

fn budgets_strategy() -> impl Strategy<Value = Vec<CategoryBudget>> {
    prop::collection::btree_map(category_strategy(), amount_strategy(), 0..=CATEGORIES.len())
        .prop_map(|map| {
            map.into_iter()
                .map(|(category, amount)| CategoryBudget::new(category, amount))
                .collect()
        })
}

fn approved_sums(requests: &[BudgetRequestRecord]) -> HashMap<Category, Decimal> {
    let mut sums = HashMap::new();
    for request in requests.iter().filter(|r| r.status.is_approved()) {
        *sums.entry(request.category()).or_insert(Decimal::ZERO) += request.amount.unwrap_or_default();
    }
    sums
}

fn expense_sums(expenses: &[ExpenseRecord]) -> HashMap<Category, Decimal> {
    let mut sums = HashMap::new();
    for expense in expenses {
        *sums.entry(expense.category()).or_insert(Decimal::ZERO) += expense.amount.unwrap_or_default();
    }
    sums
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Balance consistency**
    ///
    /// A single-category view equals the unfiltered trace restricted to that
    /// category, in both values and ordering.
    #[test]
    fn prop_filtered_view_matches_unfiltered(
        budgets in budgets_strategy(),
        requests in prop::collection::vec(request_strategy(), 0..15),
        expenses in prop::collection::vec(expense_strategy(), 0..25),
    ) {
        let trace = LedgerService::build_trace(&budgets, &requests, &expenses);

        for name in CATEGORIES {
            let category = Category::new(name);
            let filtered = trace.entries_for(Some(&category));
            let projected: Vec<_> = trace
                .entries
                .iter()
                .filter(|e| e.category == category)
                .cloned()
                .collect();
            prop_assert_eq!(filtered, projected);
        }
    }

    /// **Invariant I1**
    ///
    /// The final balance of every category equals its effective allocation
    /// (stored budget, or the approved history when that is larger) minus
    /// its expenses.
    #[test]
    fn prop_final_balance_matches_allocation_minus_spend(
        budgets in budgets_strategy(),
        requests in prop::collection::vec(request_strategy(), 0..15),
        expenses in prop::collection::vec(expense_strategy(), 0..25),
    ) {
        let trace = LedgerService::build_trace(&budgets, &requests, &expenses);
        let approved = approved_sums(&requests);
        let spent = expense_sums(&expenses);

        for (category, final_balance) in trace.balances.iter() {
            let budget = budgets
                .iter()
                .find(|b| &b.category == category)
                .map_or(Decimal::ZERO, |b| b.amount);
            let credited = approved.get(category).copied().unwrap_or_default();
            let expected = budget.max(credited) - spent.get(category).copied().unwrap_or_default();
            prop_assert_eq!(final_balance, expected);
        }
    }

    /// **Invariants I1 and I2 on a reconciled department**
    ///
    /// When every stored budget covers its approved history, each final
    /// balance is exactly budget minus expenses and the balances sum to the
    /// department's remaining OPEX.
    #[test]
    fn prop_reconciled_department_totals(
        extras in prop::collection::vec(0i64..1_000_000i64, CATEGORIES.len()),
        requests in prop::collection::vec(request_strategy(), 0..15),
        expenses in prop::collection::vec(expense_strategy(), 0..25),
    ) {
        let approved = approved_sums(&requests);
        let budgets: Vec<CategoryBudget> = CATEGORIES
            .iter()
            .zip(&extras)
            .map(|(name, extra)| {
                let category = Category::new(name);
                let credited = approved.get(&category).copied().unwrap_or_default();
                CategoryBudget::new(category, credited + Decimal::new(*extra, 2))
            })
            .collect();

        let trace = LedgerService::build_trace(&budgets, &requests, &expenses);
        let spent = expense_sums(&expenses);

        for budget in &budgets {
            let final_balance = trace.balances.get(&budget.category).unwrap_or_default();
            let expected = budget.amount - spent.get(&budget.category).copied().unwrap_or_default();
            prop_assert_eq!(final_balance, expected);
        }

        let opex_budget: Decimal = budgets.iter().map(|b| b.amount).sum();
        let opex_used: Decimal = expenses.iter().filter_map(|e| e.amount).sum();
        prop_assert_eq!(trace.balances.total(), opex_budget - opex_used);
    }

    /// **Invariant I3**
    ///
    /// Baselines are never negative and equal max(0, budget - approved).
    #[test]
    fn prop_baseline_amount_is_clamped_gap(
        budgets in budgets_strategy(),
        requests in prop::collection::vec(request_strategy(), 0..15),
    ) {
        let trace = LedgerService::build_trace(&budgets, &requests, &[]);
        let approved = approved_sums(&requests);

        for budget in &budgets {
            let credited = approved.get(&budget.category).copied().unwrap_or_default();
            let expected = (budget.amount - credited).max(Decimal::ZERO);
            let baselines: Vec<_> = trace
                .entries
                .iter()
                .filter(|e| e.is_baseline() && e.category == budget.category)
                .collect();

            if expected.is_zero() {
                prop_assert!(baselines.is_empty());
            } else {
                prop_assert_eq!(baselines.len(), 1);
                prop_assert!(baselines[0].amount > Decimal::ZERO);
                prop_assert_eq!(baselines[0].amount, expected);
            }
        }
    }

    /// **Ordering tie-break**
    ///
    /// On any calendar day every credit precedes every debit, and baselines
    /// lead the whole ledger.
    #[test]
    fn prop_credits_precede_debits_within_a_day(
        budgets in budgets_strategy(),
        requests in prop::collection::vec(request_strategy(), 0..15),
        expenses in prop::collection::vec(expense_strategy(), 0..25),
    ) {
        let trace = LedgerService::build_trace(&budgets, &requests, &expenses);

        let first_dated = trace.entries.iter().position(|e| !e.is_baseline());
        if let Some(first_dated) = first_dated {
            prop_assert!(trace.entries[first_dated..].iter().all(|e| !e.is_baseline()));
        }

        for pair in trace.entries.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if a.is_baseline() || b.is_baseline() {
                continue;
            }
            prop_assert!(a.date.date_naive() <= b.date.date_naive());
            if a.date.date_naive() == b.date.date_naive() {
                prop_assert!(!(a.entry_type == EntryType::Debit && b.entry_type == EntryType::Credit));
            }
        }
    }

    /// Building the trace twice from the same inputs yields identical output.
    #[test]
    fn prop_trace_is_replayable(
        budgets in budgets_strategy(),
        requests in prop::collection::vec(request_strategy(), 0..15),
        expenses in prop::collection::vec(expense_strategy(), 0..25),
    ) {
        let first = LedgerService::build_trace(&budgets, &requests, &expenses);
        let second = LedgerService::build_trace(&budgets, &requests, &expenses);
        prop_assert_eq!(first, second);
    }
}
