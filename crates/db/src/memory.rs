//! In-memory department store.
//!
//! Each department lives behind its own async lock and carries a revision
//! that increases on every write. Category budget replacement is a
//! compare-and-swap on that revision.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, info};

use potledger_core::ledger::RecordRef;
use potledger_core::ledger::types::{BudgetRequestRecord, CategoryBudget, ExpenseRecord};
use potledger_core::store::{FinanceStore, StoreError, Versioned};
use potledger_core::workflow::RequestStatus;
use potledger_shared::AuthContext;
use potledger_shared::types::{BudgetRequestId, Category, DepartmentId, ExpenseId, UserId};

use crate::error::RepositoryError;
use crate::snapshot::{DepartmentSnapshot, StoreSnapshot};

/// Input for logging an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Short description.
    pub title: String,
    /// Spent amount, strictly positive.
    pub amount: Decimal,
    /// Raw category name.
    pub category: Option<String>,
    /// When the money was spent.
    pub date: DateTime<Utc>,
}

/// Replacement fields for an existing budget request.
#[derive(Debug, Clone)]
pub struct AmendBudgetRequestInput {
    /// Short description.
    pub title: String,
    /// Requested amount, strictly positive.
    pub amount: Decimal,
    /// Raw category name.
    pub category: Option<String>,
    /// Why the money is needed.
    pub justification: Option<String>,
}

/// Input for raising a budget request.
#[derive(Debug, Clone)]
pub struct CreateBudgetRequestInput {
    /// User raising the request.
    pub requester_id: Option<UserId>,
    /// Short description.
    pub title: String,
    /// Requested amount, strictly positive.
    pub amount: Decimal,
    /// Raw category name.
    pub category: Option<String>,
    /// Why the money is needed.
    pub justification: Option<String>,
    /// Creation time; now when `None`.
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct DepartmentState {
    name: String,
    revision: u64,
    budgets: Vec<CategoryBudget>,
    requests: Vec<BudgetRequestRecord>,
    expenses: Vec<ExpenseRecord>,
}

impl DepartmentState {
    fn bump(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    fn credit(&mut self, category: Category, amount: Decimal) {
        match self.budgets.iter_mut().find(|b| b.category == category) {
            Some(budget) => budget.amount += amount,
            None => self.budgets.push(CategoryBudget::new(category, amount)),
        }
    }

    fn debit_clamped(&mut self, category: &Category, amount: Decimal) {
        if let Some(budget) = self.budgets.iter_mut().find(|b| &b.category == category) {
            budget.amount = (budget.amount - amount).max(Decimal::ZERO);
        }
    }

    fn request_index(&self, request_id: BudgetRequestId) -> Result<usize, RepositoryError> {
        self.requests
            .iter()
            .position(|r| r.id == request_id)
            .ok_or(RepositoryError::RecordNotFound(RecordRef::BudgetRequest(request_id)))
    }
}

impl From<DepartmentSnapshot> for DepartmentState {
    fn from(snapshot: DepartmentSnapshot) -> Self {
        Self {
            name: snapshot.name,
            revision: snapshot.revision,
            budgets: snapshot.category_budgets,
            requests: snapshot.budget_requests,
            expenses: snapshot.expenses,
        }
    }
}

/// Thread-safe in-memory [`FinanceStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    departments: DashMap<DepartmentId, Arc<RwLock<DepartmentState>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding every department of `snapshot`.
    #[must_use]
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::new();
        for department in snapshot.departments {
            let id = department.id;
            store
                .departments
                .insert(id, Arc::new(RwLock::new(department.into())));
        }
        store
    }

    /// Copies every department, ordered by ID.
    pub async fn snapshot(&self) -> StoreSnapshot {
        let mut handles: Vec<(DepartmentId, Arc<RwLock<DepartmentState>>)> = self
            .departments
            .iter()
            .map(|entry| (*entry.key(), Arc::clone(entry.value())))
            .collect();
        handles.sort_by_key(|(id, _)| *id);

        let mut departments = Vec::with_capacity(handles.len());
        for (id, handle) in handles {
            let state = handle.read().await;
            departments.push(DepartmentSnapshot {
                id,
                name: state.name.clone(),
                revision: state.revision,
                category_budgets: state.budgets.clone(),
                budget_requests: state.requests.clone(),
                expenses: state.expenses.clone(),
            });
        }

        StoreSnapshot { departments }
    }

    /// Registers a department with no budgets or records.
    pub fn create_department(&self, name: impl Into<String>) -> DepartmentId {
        let id = DepartmentId::new();
        let state = DepartmentState {
            name: name.into(),
            revision: 0,
            budgets: Vec::new(),
            requests: Vec::new(),
            expenses: Vec::new(),
        };
        self.departments.insert(id, Arc::new(RwLock::new(state)));
        info!(department_id = %id, "Department created");
        id
    }

    /// Sets the stored budget of one category, adding the category if new.
    ///
    /// Returns the new revision.
    pub async fn set_category_budget(
        &self,
        department_id: DepartmentId,
        category: impl Into<Category>,
        amount: Decimal,
    ) -> Result<u64, RepositoryError> {
        if amount < Decimal::ZERO {
            return Err(RepositoryError::NegativeBudget(amount));
        }
        let category = category.into();
        let handle = self.department(department_id)?;
        let mut state = handle.write().await;

        match state.budgets.iter_mut().find(|b| b.category == category) {
            Some(budget) => budget.amount = amount,
            None => state.budgets.push(CategoryBudget::new(category, amount)),
        }
        Ok(state.bump())
    }

    /// Logs an expense.
    pub async fn add_expense(
        &self,
        department_id: DepartmentId,
        input: CreateExpenseInput,
    ) -> Result<ExpenseRecord, RepositoryError> {
        if input.amount <= Decimal::ZERO {
            return Err(RepositoryError::NonPositiveAmount(input.amount));
        }
        let handle = self.department(department_id)?;
        let mut state = handle.write().await;

        let record = ExpenseRecord {
            id: ExpenseId::new(),
            department_id,
            title: input.title,
            amount: Some(input.amount),
            category: input.category,
            date: Some(input.date),
        };
        state.expenses.push(record.clone());
        let revision = state.bump();
        debug!(%department_id, expense_id = %record.id, revision, "Expense logged");
        Ok(record)
    }

    /// Replaces the details of an expense.
    pub async fn update_expense(
        &self,
        department_id: DepartmentId,
        expense_id: ExpenseId,
        input: CreateExpenseInput,
    ) -> Result<ExpenseRecord, RepositoryError> {
        if input.amount <= Decimal::ZERO {
            return Err(RepositoryError::NonPositiveAmount(input.amount));
        }
        let handle = self.department(department_id)?;
        let mut state = handle.write().await;

        let expense = state
            .expenses
            .iter_mut()
            .find(|e| e.id == expense_id)
            .ok_or(RepositoryError::RecordNotFound(RecordRef::Expense(expense_id)))?;
        expense.title = input.title;
        expense.amount = Some(input.amount);
        expense.category = input.category;
        expense.date = Some(input.date);
        let updated = expense.clone();

        let revision = state.bump();
        debug!(%department_id, %expense_id, revision, "Expense updated");
        Ok(updated)
    }

    /// Raises a pending budget request.
    pub async fn submit_budget_request(
        &self,
        department_id: DepartmentId,
        input: CreateBudgetRequestInput,
    ) -> Result<BudgetRequestRecord, RepositoryError> {
        if input.amount <= Decimal::ZERO {
            return Err(RepositoryError::NonPositiveAmount(input.amount));
        }
        let handle = self.department(department_id)?;
        let mut state = handle.write().await;

        let record = BudgetRequestRecord {
            id: BudgetRequestId::new(),
            department_id,
            requester_id: input.requester_id,
            title: input.title,
            amount: Some(input.amount),
            category: input.category,
            justification: input.justification,
            status: RequestStatus::Pending,
            created_at: Some(input.created_at.unwrap_or_else(Utc::now)),
            approved_by: None,
            approved_at: None,
        };
        state.requests.push(record.clone());
        let revision = state.bump();
        debug!(%department_id, request_id = %record.id, revision, "Budget request submitted");
        Ok(record)
    }

    /// Approves a pending request and credits its amount to the category
    /// budget.
    pub async fn approve_budget_request(
        &self,
        department_id: DepartmentId,
        request_id: BudgetRequestId,
        approver: UserId,
    ) -> Result<BudgetRequestRecord, RepositoryError> {
        let handle = self.department(department_id)?;
        let mut state = handle.write().await;
        let index = state.request_index(request_id)?;

        let request = &mut state.requests[index];
        request.status = request.status.approve()?;
        request.approved_by = Some(approver);
        request.approved_at = Some(Utc::now());
        let approved = request.clone();

        if let Some(amount) = approved.amount.filter(|a| *a > Decimal::ZERO) {
            state.credit(approved.category(), amount);
        }
        let revision = state.bump();
        info!(%department_id, %request_id, revision, "Budget request approved");
        Ok(approved)
    }

    /// Edits a budget request.
    ///
    /// Decided requests can only be edited by an admin. Amending an approved
    /// request moves its credit: the old amount comes off the old category,
    /// never below zero, and the new amount is credited to the new one.
    pub async fn amend_budget_request(
        &self,
        department_id: DepartmentId,
        request_id: BudgetRequestId,
        input: AmendBudgetRequestInput,
        editor: &AuthContext,
    ) -> Result<BudgetRequestRecord, RepositoryError> {
        if input.amount <= Decimal::ZERO {
            return Err(RepositoryError::NonPositiveAmount(input.amount));
        }
        let handle = self.department(department_id)?;
        let mut state = handle.write().await;
        let index = state.request_index(request_id)?;

        let request = &mut state.requests[index];
        if request.status.is_terminal() && !editor.is_admin() {
            return Err(RepositoryError::DecidedRequest {
                request_id,
                status: request.status,
            });
        }
        let old_category = request.category();
        let old_amount = request.amount.filter(|a| *a > Decimal::ZERO);
        request.title = input.title;
        request.amount = Some(input.amount);
        request.category = input.category;
        request.justification = input.justification;
        let amended = request.clone();

        if amended.status.is_approved() {
            if let Some(old_amount) = old_amount {
                state.debit_clamped(&old_category, old_amount);
            }
            state.credit(amended.category(), input.amount);
        }
        let revision = state.bump();
        info!(%department_id, %request_id, revision, editor = %editor.user_id, "Budget request amended");
        Ok(amended)
    }

    /// Rejects a pending request.
    pub async fn reject_budget_request(
        &self,
        department_id: DepartmentId,
        request_id: BudgetRequestId,
    ) -> Result<BudgetRequestRecord, RepositoryError> {
        let handle = self.department(department_id)?;
        let mut state = handle.write().await;
        let index = state.request_index(request_id)?;

        let request = &mut state.requests[index];
        request.status = request.status.reject()?;
        let rejected = request.clone();

        let revision = state.bump();
        info!(%department_id, %request_id, revision, "Budget request rejected");
        Ok(rejected)
    }

    /// Deletes an expense or a budget request.
    ///
    /// Deleting an approved request takes its amount back off the category
    /// budget, never below zero.
    pub async fn delete_record(
        &self,
        department_id: DepartmentId,
        record: RecordRef,
    ) -> Result<(), RepositoryError> {
        let handle = self.department(department_id)?;
        let mut state = handle.write().await;

        match record {
            RecordRef::Expense(expense_id) => {
                let index = state
                    .expenses
                    .iter()
                    .position(|e| e.id == expense_id)
                    .ok_or(RepositoryError::RecordNotFound(record))?;
                state.expenses.remove(index);
            }
            RecordRef::BudgetRequest(request_id) => {
                let index = state.request_index(request_id)?;
                let removed = state.requests.remove(index);
                if removed.status.is_approved()
                    && let Some(amount) = removed.amount
                {
                    state.debit_clamped(&removed.category(), amount);
                }
            }
        }

        let revision = state.bump();
        debug!(%department_id, ?record, revision, "Record deleted");
        Ok(())
    }

    fn department(
        &self,
        department_id: DepartmentId,
    ) -> Result<Arc<RwLock<DepartmentState>>, StoreError> {
        self.departments
            .get(&department_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(StoreError::DepartmentNotFound(department_id))
    }
}

#[async_trait]
impl FinanceStore for MemoryStore {
    async fn list_expenses(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<ExpenseRecord>, StoreError> {
        Ok(self.department(department_id)?.read().await.expenses.clone())
    }

    async fn list_budget_requests(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<BudgetRequestRecord>, StoreError> {
        Ok(self.department(department_id)?.read().await.requests.clone())
    }

    async fn get_category_budgets(
        &self,
        department_id: DepartmentId,
    ) -> Result<Versioned<Vec<CategoryBudget>>, StoreError> {
        let handle = self.department(department_id)?;
        let state = handle.read().await;
        Ok(Versioned::new(state.revision, state.budgets.clone()))
    }

    async fn set_category_budgets(
        &self,
        department_id: DepartmentId,
        budgets: Vec<CategoryBudget>,
        expected_revision: u64,
    ) -> Result<u64, StoreError> {
        let handle = self.department(department_id)?;
        let mut state = handle.write().await;

        if state.revision != expected_revision {
            return Err(StoreError::RevisionConflict {
                expected: expected_revision,
                actual: state.revision,
            });
        }

        state.budgets = budgets;
        let revision = state.bump();
        debug!(%department_id, revision, "Category budgets replaced");
        Ok(revision)
    }
}
