//! Age-based eviction of idle registry entries.

use super::entry::StoreEntry;
use super::manager::SessionRegistry;
use crate::session_id::SessionKey;
use std::collections::HashMap;

impl SessionRegistry {
    /// Removes every entry idle for longer than `max_age_ms`.
    ///
    /// Returns the number of entries removed. Never fails; an empty registry
    /// yields 0.
    pub fn sweep(&self, max_age_ms: i64) -> usize {
        let now = self.clock.now_millis();
        let mut entries = self.lock_entries();
        let evicted = Self::sweep_entries(&mut entries, now, max_age_ms, None);
        if evicted > 0 {
            tracing::debug!(
                target: "session_sweeper",
                evicted,
                remaining = entries.len(),
                max_age_ms,
                "Swept idle sessions"
            );
        }
        evicted
    }

    /// `sweep` with the configured `max_age_ms`.
    pub fn sweep_default(&self) -> usize {
        self.sweep(self.config.max_age_ms)
    }

    /// Evicts entries with `now - last_activity > max_age_ms`, never touching `keep`.
    pub(super) fn sweep_entries(
        entries: &mut HashMap<SessionKey, StoreEntry>,
        now: i64,
        max_age_ms: i64,
        keep: Option<&SessionKey>,
    ) -> usize {
        let before = entries.len();
        entries.retain(|key, entry| {
            Some(key) == keep || entry.idle_for(now) <= max_age_ms
        });
        before - entries.len()
    }
}
