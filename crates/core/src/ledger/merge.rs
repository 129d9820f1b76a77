//! Ledger merger.
//!
//! Orders baselines, approved-request credits and expense debits into one
//! sequence:
//! 1. calendar day ascending (baselines before any day),
//! 2. credits before debits within a day,
//! 3. creation order for everything else.
//!
//! Comparing at day granularity means a budget injected today is available
//! before an expense logged today is subtracted, whatever the timestamps.

use chrono::NaiveDate;

use super::types::{EntryType, LedgerEvent};

/// Sort key for a ledger event. Creation order is kept by the stable sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OrderKey {
    day: Option<NaiveDate>,
    rank: u8,
}

impl OrderKey {
    fn of(event: &LedgerEvent) -> Self {
        let rank = match event.entry_type {
            EntryType::Credit => 0,
            EntryType::Debit => 1,
        };
        Self {
            day: event.ordering_day(),
            rank,
        }
    }
}

/// Merges the three event streams into display order.
///
/// Each input must already be in creation order.
#[must_use]
pub fn merge(
    baselines: Vec<LedgerEvent>,
    credits: Vec<LedgerEvent>,
    debits: Vec<LedgerEvent>,
) -> Vec<LedgerEvent> {
    let mut events = Vec::with_capacity(baselines.len() + credits.len() + debits.len());
    events.extend(baselines);
    events.extend(credits);
    events.extend(debits);

    events.sort_by_key(OrderKey::of);
    events
}
