use crate::session_id::SessionKey;
use crate::store::StoreHandle;
use serde::Serialize;
use uuid::Uuid;

/// One registry slot: a store plus its activity bookkeeping.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    pub store: StoreHandle,
    /// Unix millis when the entry was inserted
    pub created_at: i64,
    /// Unix millis of the most recent lookup
    pub last_activity: i64,
}

impl StoreEntry {
    pub fn new(store: StoreHandle, now: i64) -> Self {
        Self {
            store,
            created_at: now,
            last_activity: now,
        }
    }

    /// Milliseconds since the last lookup.
    pub fn idle_for(&self, now: i64) -> i64 {
        now - self.last_activity
    }

    pub fn touch(&mut self, now: i64) {
        self.last_activity = now;
    }
}

/// Read-only view of an entry, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub key: SessionKey,
    pub store_id: Uuid,
    pub created_at: i64,
    pub last_activity: i64,
}

impl SessionSummary {
    pub(crate) fn from_entry(key: &SessionKey, entry: &StoreEntry) -> Self {
        Self {
            key: key.clone(),
            store_id: entry.store.id(),
            created_at: entry.created_at,
            last_activity: entry.last_activity,
        }
    }
}
