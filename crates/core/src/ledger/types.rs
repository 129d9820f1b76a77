//! Ledger domain types.
//!
//! Stored records (`ExpenseRecord`, `BudgetRequestRecord`) mirror what the
//! collaborating CRUD layer persists, including rows whose amount or date is
//! missing. They are validated into `LedgerEvent`s before they reach the
//! merger, and the fold turns events into annotated `LedgerEntry` rows.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use potledger_shared::types::{BudgetRequestId, Category, DepartmentId, ExpenseId, UserId};

use crate::workflow::RequestStatus;

/// Display date given to synthetic baseline entries.
///
/// Ordering does not rely on this value: baselines sort ahead of every dated
/// record, including records dated before it.
#[must_use]
pub fn baseline_date() -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Allocated amount for one category of a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBudget {
    /// Category name.
    pub category: Category,
    /// Allocated amount.
    pub amount: Decimal,
}

impl CategoryBudget {
    /// Creates a new category budget.
    #[must_use]
    pub fn new(category: impl Into<Category>, amount: Decimal) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }

    /// Collapses entries whose names normalize to the same category.
    ///
    /// Amounts of duplicates are added to the first occurrence, which keeps
    /// its position.
    #[must_use]
    pub fn merge_duplicates(budgets: &[Self]) -> Vec<Self> {
        let mut merged: Vec<Self> = Vec::with_capacity(budgets.len());
        for budget in budgets {
            match merged.iter_mut().find(|b| b.category == budget.category) {
                Some(existing) => existing.amount += budget.amount,
                None => merged.push(budget.clone()),
            }
        }
        merged
    }
}

/// An expense as stored by the expense CRUD layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Expense ID.
    pub id: ExpenseId,
    /// Owning department.
    pub department_id: DepartmentId,
    /// Short description.
    pub title: String,
    /// Spent amount. `None` when missing or unparseable.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Option<Decimal>,
    /// Raw category name.
    #[serde(default)]
    pub category: Option<String>,
    /// When the money was spent. `None` when missing or unparseable.
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub date: Option<DateTime<Utc>>,
}

/// A budget request as stored by the request CRUD layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRequestRecord {
    /// Request ID.
    pub id: BudgetRequestId,
    /// Owning department.
    pub department_id: DepartmentId,
    /// User who raised the request.
    #[serde(default)]
    pub requester_id: Option<UserId>,
    /// Short description.
    pub title: String,
    /// Requested amount. `None` when missing or unparseable.
    #[serde(default, deserialize_with = "lenient::decimal")]
    pub amount: Option<Decimal>,
    /// Raw category name.
    #[serde(default)]
    pub category: Option<String>,
    /// Why the money is needed.
    #[serde(default)]
    pub justification: Option<String>,
    /// Workflow status.
    #[serde(default)]
    pub status: RequestStatus,
    /// When the request was raised. `None` when missing or unparseable.
    #[serde(default, deserialize_with = "lenient::datetime")]
    pub created_at: Option<DateTime<Utc>>,
    /// Approver, once approved.
    #[serde(default)]
    pub approved_by: Option<UserId>,
    /// Approval time, once approved.
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
}

/// Direction of a ledger movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money added to a category.
    Credit,
    /// Money taken from a category.
    Debit,
}

impl EntryType {
    /// Applies the direction to an unsigned amount.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Credit => amount,
            Self::Debit => -amount,
        }
    }
}

/// Reference to a persisted record that backs a ledger entry.
///
/// Edit and delete operations accept this type, so a synthetic baseline can
/// never be handed to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum RecordRef {
    /// A logged expense.
    Expense(ExpenseId),
    /// An approved budget request.
    BudgetRequest(BudgetRequestId),
}

/// Where a ledger entry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    /// Backed by a stored record.
    Persisted(RecordRef),
    /// Baseline allocation with no backing record.
    Synthetic,
}

impl EntryOrigin {
    /// The backing record, if any.
    #[must_use]
    pub const fn record(&self) -> Option<RecordRef> {
        match self {
            Self::Persisted(record) => Some(*record),
            Self::Synthetic => None,
        }
    }
}

/// A validated, not yet balanced, ledger movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEvent {
    /// Origin of the movement.
    pub origin: EntryOrigin,
    /// Normalized category.
    pub category: Category,
    /// Display title.
    pub title: String,
    /// Direction.
    pub entry_type: EntryType,
    /// Unsigned, strictly positive amount.
    pub amount: Decimal,
    /// Effective date.
    pub date: DateTime<Utc>,
}

impl LedgerEvent {
    /// Calendar day used for ordering; `None` for baselines, which precede
    /// every dated movement.
    #[must_use]
    pub fn ordering_day(&self) -> Option<NaiveDate> {
        match self.origin {
            EntryOrigin::Synthetic => None,
            EntryOrigin::Persisted(_) => Some(self.date.date_naive()),
        }
    }
}

/// Why a stored record was left out of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "value", rename_all = "snake_case")]
pub enum MalformedReason {
    /// Amount is missing or could not be parsed.
    MissingAmount,
    /// Amount is zero or negative.
    NonPositiveAmount(Decimal),
    /// Date is missing or could not be parsed.
    MissingDate,
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAmount => write!(f, "missing or unparseable amount"),
            Self::NonPositiveAmount(amount) => write!(f, "non-positive amount {amount}"),
            Self::MissingDate => write!(f, "missing or unparseable date"),
        }
    }
}

/// A record excluded from the ledger trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// The offending record.
    pub record: RecordRef,
    /// What was wrong with it.
    #[serde(flatten)]
    pub reason: MalformedReason,
}

fn validated_amount(amount: Option<Decimal>) -> Result<Decimal, MalformedReason> {
    match amount {
        None => Err(MalformedReason::MissingAmount),
        Some(value) if value <= Decimal::ZERO => Err(MalformedReason::NonPositiveAmount(value)),
        Some(value) => Ok(value),
    }
}

impl ExpenseRecord {
    /// Normalized category of the expense.
    #[must_use]
    pub fn category(&self) -> Category {
        Category::from_optional(self.category.as_deref())
    }

    /// Validates the record into a debit event.
    ///
    /// # Errors
    ///
    /// Returns a `SkippedRecord` when the amount or date is unusable.
    pub fn to_event(&self) -> Result<LedgerEvent, SkippedRecord> {
        let record = RecordRef::Expense(self.id);
        let skip = |reason| SkippedRecord { record, reason };

        let amount = validated_amount(self.amount).map_err(skip)?;
        let date = self.date.ok_or(MalformedReason::MissingDate).map_err(skip)?;

        Ok(LedgerEvent {
            origin: EntryOrigin::Persisted(record),
            category: self.category(),
            title: self.title.clone(),
            entry_type: EntryType::Debit,
            amount,
            date,
        })
    }
}

impl BudgetRequestRecord {
    /// Normalized category of the request.
    #[must_use]
    pub fn category(&self) -> Category {
        Category::from_optional(self.category.as_deref())
    }

    /// Validates the record into a credit event.
    ///
    /// Callers are expected to pass approved requests only.
    ///
    /// # Errors
    ///
    /// Returns a `SkippedRecord` when the amount or date is unusable.
    pub fn to_event(&self) -> Result<LedgerEvent, SkippedRecord> {
        let record = RecordRef::BudgetRequest(self.id);
        let skip = |reason| SkippedRecord { record, reason };

        let amount = validated_amount(self.amount).map_err(skip)?;
        let date = self
            .created_at
            .ok_or(MalformedReason::MissingDate)
            .map_err(skip)?;

        Ok(LedgerEvent {
            origin: EntryOrigin::Persisted(record),
            category: self.category(),
            title: self.title.clone(),
            entry_type: EntryType::Credit,
            amount,
            date,
        })
    }
}

/// One row of the ledger, annotated with its category's running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Normalized category.
    pub category: Category,
    /// Display title.
    pub title: String,
    /// Direction.
    pub entry_type: EntryType,
    /// Signed amount: positive for credits, negative for debits.
    pub amount: Decimal,
    /// Effective date.
    pub date: DateTime<Utc>,
    /// Backing record or synthetic marker.
    pub origin: EntryOrigin,
    /// Category balance after this entry.
    pub running_balance: Decimal,
}

impl LedgerEntry {
    /// Whether this is a synthetic baseline allocation.
    #[must_use]
    pub const fn is_baseline(&self) -> bool {
        matches!(self.origin, EntryOrigin::Synthetic)
    }

    /// The backing record, which is what edit/delete operations act on.
    #[must_use]
    pub const fn record(&self) -> Option<RecordRef> {
        self.origin.record()
    }
}

/// Lenient decoders for fields that older rows may hold in odd shapes.
///
/// Anything that does not parse decodes as `None` so the row can be skipped
/// later instead of failing the whole load.
mod lenient {
    use std::str::FromStr;

    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .ok(),
            Some(Value::String(s)) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        })
    }

    pub fn datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        let Some(Value::String(raw)) = value else {
            return Ok(None);
        };
        let raw = raw.trim();

        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Some(parsed.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Some(naive.and_utc()));
        }
        Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc()))
    }
}
