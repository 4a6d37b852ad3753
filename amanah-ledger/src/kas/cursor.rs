use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::LedgerEntry;
use crate::{primitives::*, query::*};

/// Position of an entry in newest-first listing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryByDateCursor {
    pub entry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub id: LedgerEntryId,
}

impl From<&LedgerEntry> for LedgerEntryByDateCursor {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            entry_date: entry.entry_date,
            created_at: entry.created_at,
            id: entry.id,
        }
    }
}

impl Default for PaginatedQueryArgs<LedgerEntryByDateCursor> {
    fn default() -> Self {
        Self {
            first: 100,
            after: None,
        }
    }
}

/// Optional narrowing of a ledger listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerEntryFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub direction: Option<CashDirection>,
}
