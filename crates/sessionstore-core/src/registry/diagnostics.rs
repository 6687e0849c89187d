//! Registry occupancy statistics for operational logging.

use super::manager::SessionRegistry;
use serde::{Deserialize, Serialize};

/// Snapshot of registry occupancy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total: usize,
    /// Entries accessed within the active window
    pub active: usize,
    /// Entries still present but idle longer than the active window
    pub inactive: usize,
    /// Smallest `last_activity` among entries
    pub oldest_timestamp: Option<i64>,
    /// Largest `last_activity` among entries
    pub newest_timestamp: Option<i64>,
}

impl RegistryStats {
    /// Emits the snapshot as a single structured log line.
    pub fn log(&self) {
        tracing::info!(
            target: "session_registry",
            total = self.total,
            active = self.active,
            inactive = self.inactive,
            oldest = ?self.oldest_timestamp,
            newest = ?self.newest_timestamp,
            "Session registry stats"
        );
    }
}

impl SessionRegistry {
    /// Counts entries by recency. Read-only.
    pub fn stats(&self) -> RegistryStats {
        let now = self.clock.now_millis();
        let window = self.config.active_window_ms;
        let entries = self.lock_entries();

        let mut stats = RegistryStats {
            total: entries.len(),
            ..Default::default()
        };
        for entry in entries.values() {
            if entry.idle_for(now) <= window {
                stats.active += 1;
            } else {
                stats.inactive += 1;
            }
            let ts = entry.last_activity;
            stats.oldest_timestamp = Some(stats.oldest_timestamp.map_or(ts, |o| o.min(ts)));
            stats.newest_timestamp = Some(stats.newest_timestamp.map_or(ts, |n| n.max(ts)));
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::session_id::{BrowserSessionIdProvider, SessionKey};
    use std::sync::Arc;

    const MINUTE: i64 = 60 * 1000;

    #[test]
    fn test_stats_empty() {
        let registry = SessionRegistry::builder().init().unwrap();
        assert_eq!(registry.stats(), RegistryStats::default());
    }

    #[test]
    fn test_stats_splits_active_and_inactive() {
        let clock = Arc::new(ManualClock::new(1_000));
        let registry = SessionRegistry::builder()
            .with_clock(clock.clone())
            .with_session_ids(Arc::new(BrowserSessionIdProvider::with_clock(clock.clone())))
            .init()
            .unwrap();

        registry.get_store_for(&SessionKey::from("idle")).unwrap();
        clock.advance(10 * MINUTE);
        registry.get_store_for(&SessionKey::from("busy")).unwrap();
        clock.advance(MINUTE);

        let stats = registry.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.oldest_timestamp, Some(1_000));
        assert_eq!(stats.newest_timestamp, Some(1_000 + 10 * MINUTE));
    }

    #[test]
    fn test_stats_does_not_touch_entries() {
        let clock = Arc::new(ManualClock::new(0));
        let registry = SessionRegistry::builder()
            .with_clock(clock.clone())
            .init()
            .unwrap();
        let key = SessionKey::from("k");
        registry.get_store_for(&key).unwrap();

        clock.advance(MINUTE);
        registry.stats();

        assert_eq!(registry.last_activity(&key), Some(0));
    }

    #[test]
    fn test_stats_serializes_camel_case() {
        let json = serde_json::to_value(RegistryStats::default()).unwrap();
        assert!(json.get("oldestTimestamp").is_some());
    }
}
