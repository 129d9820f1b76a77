//! Department finance orchestration.
//!
//! [`FinanceService`] fetches a department's records through a
//! [`FinanceStore`], runs the pure ledger and budget logic over them, and
//! writes recalculated budgets back. Every store round-trip carries the
//! configured deadline.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use potledger_shared::types::{Category, DepartmentId};
use potledger_shared::{AuthContext, LedgerConfig};

use crate::budget::{self, BudgetChange, DepartmentOverview};
use crate::ledger::types::{BudgetRequestRecord, CategoryBudget, ExpenseRecord};
use crate::ledger::{CategorySummary, LedgerEntry, LedgerError, LedgerService, LedgerTrace, SkippedRecord};
use crate::store::{FinanceStore, StoreError, Versioned};

/// Ledger of a department, optionally narrowed to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerView {
    /// Department ID.
    pub department_id: DepartmentId,
    /// Category filter that was applied, if any.
    pub category: Option<Category>,
    /// Entries in display order with full-ledger running balances.
    pub entries: Vec<LedgerEntry>,
    /// Records left out of the ledger.
    pub skipped: Vec<SkippedRecord>,
}

/// Result of a committed recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecalculationReport {
    /// Department ID.
    pub department_id: DepartmentId,
    /// Category budgets now stored.
    pub budgets: Vec<CategoryBudget>,
    /// Categories whose amount changed.
    pub changes: Vec<BudgetChange>,
    /// Department revision after the write.
    pub revision: u64,
    /// Attempts needed, including the successful one.
    pub attempts: u32,
}

struct DepartmentRecords {
    budgets: Versioned<Vec<CategoryBudget>>,
    requests: Vec<BudgetRequestRecord>,
    expenses: Vec<ExpenseRecord>,
}

/// Read and recalculation operations over one store.
pub struct FinanceService<S: ?Sized> {
    store: Arc<S>,
    config: LedgerConfig,
}

impl<S: ?Sized> Clone for FinanceService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: FinanceStore + ?Sized> FinanceService<S> {
    /// Creates a service over `store`.
    pub fn new(store: Arc<S>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store.
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Ledger entries of a department, optionally filtered to one category.
    ///
    /// Running balances are computed over the whole ledger before filtering.
    #[instrument(skip(self))]
    pub async fn get_ledger(
        &self,
        department_id: DepartmentId,
        category: Option<&Category>,
    ) -> Result<LedgerView, LedgerError> {
        let trace = self.load_trace(department_id).await?;

        Ok(LedgerView {
            department_id,
            category: category.cloned(),
            entries: trace.entries_for(category),
            skipped: trace.skipped,
        })
    }

    /// Final balance per category, sorted by category name.
    #[instrument(skip(self))]
    pub async fn get_summary(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<CategorySummary>, LedgerError> {
        Ok(self.load_trace(department_id).await?.summary())
    }

    /// OPEX totals and per-category utilization.
    #[instrument(skip(self))]
    pub async fn get_overview(
        &self,
        department_id: DepartmentId,
    ) -> Result<DepartmentOverview, LedgerError> {
        let records = self.load_records(department_id).await?;

        Ok(budget::overview(
            department_id,
            &records.budgets.value,
            &records.requests,
            &records.expenses,
        ))
    }

    /// Rederives the department's stored category budgets from its approved
    /// requests and commits them in one conditional write.
    ///
    /// A concurrent write to the department invalidates the snapshot and the
    /// whole read-compute-write cycle starts over, up to the configured
    /// number of retries. Nothing is written when every attempt conflicts.
    #[instrument(skip(self, auth), fields(user_id = %auth.user_id, role = %auth.role))]
    pub async fn recalculate(
        &self,
        auth: &AuthContext,
        department_id: DepartmentId,
    ) -> Result<RecalculationReport, LedgerError> {
        if !auth.can_recalculate() {
            warn!("Recalculation refused for role");
            return Err(LedgerError::Forbidden {
                role: auth.role,
                action: "recalculate category budgets",
            });
        }

        let max_attempts = self.config.recalculation_max_retries.saturating_add(1);

        for attempt in 1..=max_attempts {
            let current = self
                .with_deadline("get_category_budgets", self.store.get_category_budgets(department_id))
                .await?;
            let requests = self
                .with_deadline("list_budget_requests", self.store.list_budget_requests(department_id))
                .await?;

            let outcome =
                budget::recalculate(&current.value, &requests, self.config.stale_category_policy);

            if outcome.budgets == current.value {
                debug!(attempt, revision = current.revision, "Category budgets already reconciled");
                return Ok(RecalculationReport {
                    department_id,
                    budgets: outcome.budgets,
                    changes: outcome.changes,
                    revision: current.revision,
                    attempts: attempt,
                });
            }

            let written = self
                .with_deadline(
                    "set_category_budgets",
                    self.store.set_category_budgets(
                        department_id,
                        outcome.budgets.clone(),
                        current.revision,
                    ),
                )
                .await;

            match written {
                Ok(revision) => {
                    info!(
                        attempt,
                        revision,
                        changed = outcome.changes.len(),
                        "Category budgets recalculated"
                    );
                    return Ok(RecalculationReport {
                        department_id,
                        budgets: outcome.budgets,
                        changes: outcome.changes,
                        revision,
                        attempts: attempt,
                    });
                }
                Err(LedgerError::Store(StoreError::RevisionConflict { expected, actual })) => {
                    debug!(attempt, expected, actual, "Concurrent write, retrying recalculation");
                }
                Err(err) => return Err(err),
            }
        }

        warn!(attempts = max_attempts, "Recalculation gave up after repeated conflicts");
        Err(LedgerError::RecalculationConflict {
            department_id,
            attempts: max_attempts,
        })
    }

    async fn load_trace(&self, department_id: DepartmentId) -> Result<LedgerTrace, LedgerError> {
        let records = self.load_records(department_id).await?;
        let trace = LedgerService::build_trace(
            &records.budgets.value,
            &records.requests,
            &records.expenses,
        );

        for skipped in &trace.skipped {
            warn!(
                %department_id,
                record = ?skipped.record,
                reason = %skipped.reason,
                "Skipping malformed record"
            );
        }

        Ok(trace)
    }

    async fn load_records(&self, department_id: DepartmentId) -> Result<DepartmentRecords, LedgerError> {
        let (budgets, requests, expenses) = tokio::try_join!(
            self.with_deadline("get_category_budgets", self.store.get_category_budgets(department_id)),
            self.with_deadline("list_budget_requests", self.store.list_budget_requests(department_id)),
            self.with_deadline("list_expenses", self.store.list_expenses(department_id)),
        )?;

        Ok(DepartmentRecords {
            budgets,
            requests,
            expenses,
        })
    }

    async fn with_deadline<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, LedgerError> {
        match tokio::time::timeout(self.config.store_timeout(), call).await {
            Ok(result) => result.map_err(LedgerError::from),
            Err(_) => {
                warn!(operation, "Storage call exceeded its deadline");
                Err(LedgerError::Timeout { operation })
            }
        }
    }
}
