use super::entry::{SessionSummary, StoreEntry};
use crate::clock::{Clock, SystemClock};
use crate::config::RegistryConfig;
use crate::error::{Result, SessionStoreError};
use crate::hydration::{HydrationHandoff, SerializedState};
use crate::session_id::{BrowserSessionIdProvider, SessionIdProvider, SessionKey};
use crate::state::{AppState, PartialState};
use crate::store::{StoreHandle, create_store, create_store_from_value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Process-wide map from session key to store.
///
/// `SessionRegistry` is responsible for:
/// - Resolving the current session through its `SessionIdProvider`
/// - Creating a store on first access, seeded from a hydration payload or the demo state
/// - Refreshing the activity timestamp on every later access
/// - Evicting idle entries (see `sweep`)
///
/// All map mutations happen under one lock, so there is at most one store per
/// session key even when called from several threads.
pub struct SessionRegistry {
    /// Live entries keyed by session
    entries: Mutex<HashMap<SessionKey, StoreEntry>>,
    /// Strategy for deriving the caller's session key
    session_ids: Arc<dyn SessionIdProvider>,
    pub(super) clock: Arc<dyn Clock>,
    /// Server-provided seed for the next store created
    hydration: HydrationHandoff,
    pub(super) config: RegistryConfig,
    shut_down: AtomicBool,
}

impl SessionRegistry {
    /// Starts building a registry.
    pub fn builder() -> SessionRegistryBuilder {
        SessionRegistryBuilder::new()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn session_ids(&self) -> &Arc<dyn SessionIdProvider> {
        &self.session_ids
    }

    /// Returns the key of the session making the call.
    pub fn current_session(&self) -> SessionKey {
        self.session_ids.session_id()
    }

    pub(super) fn lock_entries(&self) -> MutexGuard<'_, HashMap<SessionKey, StoreEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.shut_down.load(Ordering::SeqCst) {
            return Err(SessionStoreError::RegistryShutdown);
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        !self.shut_down.load(Ordering::SeqCst)
    }

    /// Returns the store for the current session, creating it if needed.
    ///
    /// Repeated calls within one session return the same handle until the
    /// entry is reset or evicted.
    ///
    /// # Errors
    ///
    /// - `RegistryShutdown` after `shutdown()`
    /// - A serialization error when a pending hydration payload has the wrong
    ///   shape. The payload is consumed and no entry is inserted.
    pub fn get_store(&self) -> Result<StoreHandle> {
        let key = self.session_ids.session_id();
        self.get_store_for(&key)
    }

    /// Same as `get_store`, for an explicit session key.
    ///
    /// A missing entry's store is built before anything else touches the
    /// map, so a construction failure leaves every entry in place.
    pub fn get_store_for(&self, key: &SessionKey) -> Result<StoreHandle> {
        self.ensure_running()?;
        let now = self.clock.now_millis();
        let mut entries = self.lock_entries();

        let existing = entries.get(key).map(|entry| entry.store.clone());
        let created = existing.is_none();
        let store = match existing {
            Some(store) => store,
            None => self.build_initial_store()?,
        };

        let evicted = Self::sweep_entries(&mut entries, now, self.config.max_age_ms, Some(key));
        if evicted > 0 {
            tracing::debug!(
                target: "session_sweeper",
                evicted,
                remaining = entries.len(),
                "Evicted idle sessions during lookup"
            );
        }

        if created {
            entries.insert(key.clone(), StoreEntry::new(store.clone(), now));
            tracing::info!(
                target: "session_registry",
                session = %key,
                store_id = %store.id(),
                total = entries.len(),
                "Created session store"
            );
        } else if let Some(entry) = entries.get_mut(key) {
            entry.touch(now);
        }
        Ok(store)
    }

    /// Constructs the store for a new entry.
    ///
    /// Prefers the pending hydration payload; otherwise uses the demo seed.
    fn build_initial_store(&self) -> Result<StoreHandle> {
        match self.hydration.take() {
            Some(payload) => {
                tracing::debug!(target: "session_registry", "Seeding store from hydration payload");
                create_store_from_value(Some(payload)).inspect_err(|e| {
                    tracing::warn!(
                        target: "session_registry",
                        error = %e,
                        "Hydration payload rejected by store factory"
                    );
                })
            }
            None => Ok(create_store(Some(PartialState::from(AppState::demo())))),
        }
    }

    /// Removes the current session's entry. Missing entries are not an error.
    ///
    /// Returns whether an entry was removed.
    pub fn reset_store(&self) -> bool {
        let key = self.session_ids.session_id();
        self.reset_store_for(&key)
    }

    pub fn reset_store_for(&self, key: &SessionKey) -> bool {
        let removed = self.lock_entries().remove(key).is_some();
        if removed {
            tracing::info!(target: "session_registry", session = %key, "Reset session store");
        }
        removed
    }

    /// Queues a server payload to seed the next store this registry creates.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the payload is not valid JSON.
    pub fn hydrate(&self, serialized: &SerializedState) -> Result<()> {
        self.hydration.offer_serialized(serialized)
    }

    pub fn hydration(&self) -> &HydrationHandoff {
        &self.hydration
    }

    /// Drops every entry regardless of age. Returns how many were removed.
    pub fn force_cleanup_all(&self) -> usize {
        let mut entries = self.lock_entries();
        let removed = entries.len();
        entries.clear();
        tracing::info!(target: "session_registry", removed, "Force-cleaned all session stores");
        removed
    }

    /// Stops handing out stores and releases every entry.
    ///
    /// Returns how many entries were dropped. Calling it again is a no-op.
    pub fn shutdown(&self) -> usize {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return 0;
        }
        let _ = self.hydration.take();
        let mut entries = self.lock_entries();
        let removed = entries.len();
        entries.clear();
        tracing::info!(target: "session_registry", removed, "Session registry shut down");
        removed
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    pub fn contains(&self, key: &SessionKey) -> bool {
        self.lock_entries().contains_key(key)
    }

    /// Last activity timestamp of `key`, if present.
    pub fn last_activity(&self, key: &SessionKey) -> Option<i64> {
        self.lock_entries().get(key).map(|entry| entry.last_activity)
    }

    /// Snapshot of all entries, most recently active first.
    pub fn list_sessions(&self) -> Vec<SessionSummary> {
        let entries = self.lock_entries();
        let mut sessions: Vec<SessionSummary> = entries
            .iter()
            .map(|(key, entry)| SessionSummary::from_entry(key, entry))
            .collect();
        sessions.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        sessions
    }
}

/// Fluent builder for `SessionRegistry`.
///
/// # Example
/// ```
/// use sessionstore_core::registry::SessionRegistry;
/// use sessionstore_core::session_id::RequestSessionIdProvider;
/// use std::sync::Arc;
///
/// let registry = SessionRegistry::builder()
///     .with_session_ids(Arc::new(RequestSessionIdProvider::new()))
///     .init()
///     .unwrap();
///
/// assert!(registry.is_empty());
/// ```
#[derive(Default)]
pub struct SessionRegistryBuilder {
    config: RegistryConfig,
    session_ids: Option<Arc<dyn SessionIdProvider>>,
    clock: Option<Arc<dyn Clock>>,
}

impl SessionRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the session key strategy. Defaults to `BrowserSessionIdProvider`.
    pub fn with_session_ids(mut self, provider: Arc<dyn SessionIdProvider>) -> Self {
        self.session_ids = Some(provider);
        self
    }

    /// Sets the time source. Defaults to `SystemClock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validates the configuration and starts the registry.
    ///
    /// # Errors
    ///
    /// Returns a config error if any configured duration is not positive.
    pub fn init(self) -> Result<Arc<SessionRegistry>> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let session_ids = self
            .session_ids
            .unwrap_or_else(|| Arc::new(BrowserSessionIdProvider::with_clock(clock.clone())));

        tracing::info!(
            target: "session_registry",
            context = ?session_ids.context(),
            max_age_ms = self.config.max_age_ms,
            "Session registry initialized"
        );

        Ok(Arc::new(SessionRegistry {
            entries: Mutex::new(HashMap::new()),
            session_ids,
            clock,
            hydration: HydrationHandoff::new(),
            config: self.config,
            shut_down: AtomicBool::new(false),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::session_id::{ExecutionContext, FixedSessionIdProvider, RequestSessionIdProvider};
    use crate::state::{Action, ThemeMode};

    fn client_registry(clock: Arc<ManualClock>) -> Arc<SessionRegistry> {
        SessionRegistry::builder()
            .with_clock(clock.clone())
            .with_session_ids(Arc::new(BrowserSessionIdProvider::with_clock(clock)))
            .init()
            .unwrap()
    }

    #[test]
    fn test_get_store_returns_same_handle() {
        let registry = client_registry(Arc::new(ManualClock::new(0)));

        let first = registry.get_store().unwrap();
        let second = registry.get_store().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_store_bumps_last_activity() {
        let clock = Arc::new(ManualClock::new(1_000));
        let registry = client_registry(clock.clone());
        let key = registry.current_session();

        registry.get_store().unwrap();
        assert_eq!(registry.last_activity(&key), Some(1_000));

        clock.advance(500);
        registry.get_store().unwrap();
        assert_eq!(registry.last_activity(&key), Some(1_500));
    }

    #[test]
    fn test_new_store_uses_demo_seed() {
        let registry = client_registry(Arc::new(ManualClock::new(0)));
        let store = registry.get_store().unwrap();
        assert_eq!(store.state(), AppState::demo());
    }

    #[test]
    fn test_hydration_payload_seeds_once() {
        let registry = client_registry(Arc::new(ManualClock::new(0)));
        registry
            .hydrate(&SerializedState::new(
                r#"{"favorites":{"favoriteIds":["a","b"]},"theme":{"mode":"dark"}}"#,
            ))
            .unwrap();

        let store = registry.get_store().unwrap();
        assert_eq!(store.state().favorites.favorite_ids, vec!["a", "b"]);
        assert_eq!(store.state().theme.mode, ThemeMode::Dark);
        assert!(!registry.hydration().is_pending());

        registry.reset_store();
        let fresh = registry.get_store().unwrap();
        assert_eq!(fresh.state(), AppState::demo());
    }

    #[test]
    fn test_malformed_payload_leaves_registry_unmodified() {
        let registry = client_registry(Arc::new(ManualClock::new(0)));
        registry
            .hydrate(&SerializedState::new(r#"{"theme":{"mode":"sepia"}}"#))
            .unwrap();

        let err = registry.get_store().unwrap_err();
        assert!(err.is_serialization());
        assert!(registry.is_empty());

        // Payload was consumed; the next call falls back to the demo seed.
        let store = registry.get_store().unwrap();
        assert_eq!(store.state(), AppState::demo());
    }

    #[test]
    fn test_failed_construction_keeps_stale_entries() {
        let clock = Arc::new(ManualClock::new(0));
        let registry = client_registry(clock.clone());
        registry.get_store_for(&SessionKey::from("old")).unwrap();

        clock.advance(40 * 60 * 1000);
        registry
            .hydrate(&SerializedState::new(r#"{"favorites":"bad"}"#))
            .unwrap();

        assert!(registry.get_store().unwrap_err().is_serialization());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&SessionKey::from("old")));
        assert_eq!(registry.last_activity(&SessionKey::from("old")), Some(0));

        // The next successful lookup runs the sweep as usual.
        registry.get_store().unwrap();
        assert!(!registry.contains(&SessionKey::from("old")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let registry = client_registry(Arc::new(ManualClock::new(0)));
        let before = registry.get_store().unwrap();

        assert!(registry.reset_store());
        assert!(!registry.reset_store());

        let after = registry.get_store().unwrap();
        assert_ne!(before.id(), after.id());
    }

    #[test]
    fn test_request_provider_creates_entry_per_call() {
        let clock = Arc::new(ManualClock::new(0));
        let registry = SessionRegistry::builder()
            .with_clock(clock.clone())
            .with_session_ids(Arc::new(RequestSessionIdProvider::with_clock(clock)))
            .init()
            .unwrap();

        let first = registry.get_store().unwrap();
        let second = registry.get_store().unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_store_mutations_visible_through_registry() {
        let registry = client_registry(Arc::new(ManualClock::new(0)));
        registry
            .get_store()
            .unwrap()
            .dispatch(Action::AddFavorite("9".into()));

        let state = registry.get_store().unwrap().state();
        assert_eq!(state.favorites.favorite_ids, vec!["1", "3", "9"]);
    }

    #[test]
    fn test_force_cleanup_all() {
        let registry = client_registry(Arc::new(ManualClock::new(0)));
        registry.get_store_for(&SessionKey::from("a")).unwrap();
        registry.get_store_for(&SessionKey::from("b")).unwrap();

        assert_eq!(registry.force_cleanup_all(), 2);
        assert!(registry.is_empty());
        assert_eq!(registry.force_cleanup_all(), 0);
    }

    #[test]
    fn test_shutdown_rejects_further_lookups() {
        let registry = client_registry(Arc::new(ManualClock::new(0)));
        registry.get_store().unwrap();

        assert_eq!(registry.shutdown(), 1);
        assert_eq!(registry.shutdown(), 0);
        assert!(!registry.is_running());
        assert!(registry.get_store().unwrap_err().is_shutdown());
    }

    #[test]
    fn test_init_rejects_invalid_config() {
        let config = RegistryConfig {
            max_age_ms: -1,
            ..Default::default()
        };
        let result = SessionRegistry::builder().with_config(config).init();
        match result {
            Err(err) => assert!(err.is_config()),
            Ok(_) => panic!("negative max_age_ms should be rejected"),
        }
    }

    #[test]
    fn test_list_sessions_orders_by_recency() {
        let clock = Arc::new(ManualClock::new(0));
        let registry = client_registry(clock.clone());
        registry.get_store_for(&SessionKey::from("old")).unwrap();
        clock.advance(10);
        registry.get_store_for(&SessionKey::from("new")).unwrap();

        let sessions = registry.list_sessions();
        assert_eq!(sessions[0].key, SessionKey::from("new"));
        assert_eq!(sessions[1].key, SessionKey::from("old"));
        assert_eq!(sessions[1].last_activity, 0);
    }

    #[test]
    fn test_concurrent_lookups_share_one_store() {
        let registry = SessionRegistry::builder()
            .with_session_ids(Arc::new(FixedSessionIdProvider::new(
                "shared",
                ExecutionContext::Server,
            )))
            .init()
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || registry.get_store().unwrap().id())
            })
            .collect();
        let ids: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(ids.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(registry.len(), 1);
    }
}
