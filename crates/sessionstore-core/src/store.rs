//! Store factory.
//!
//! A `Store` is an isolated state container: it owns one `AppState`, applies
//! `Action`s through the reducer, and notifies subscribers of changes.

use crate::error::Result;
use crate::state::{Action, AppState, PartialState, reduce};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

/// Shared handle to a store. Cloning the handle never clones the state.
pub type StoreHandle = Arc<Store>;

pub struct Store {
    id: Uuid,
    state: watch::Sender<AppState>,
}

impl Store {
    fn new(initial: AppState) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            id: Uuid::new_v4(),
            state,
        }
    }

    /// Unique identifier of this store instance.
    ///
    /// Two handles with the same id point at the same construction.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Applies `action` and notifies subscribers if the state changed.
    ///
    /// Returns whether the state changed.
    pub fn dispatch(&self, action: Action) -> bool {
        tracing::trace!(store_id = %self.id, ?action, "Dispatching action");
        self.state.send_if_modified(|state| reduce(state, action))
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.subscribe()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.id)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

/// Builds a fresh store pre-loaded with `seed`.
///
/// Slices absent from the seed take their defaults; `None` yields a fully
/// default state.
pub fn create_store(seed: Option<PartialState>) -> StoreHandle {
    let initial = seed.map(AppState::from_partial).unwrap_or_default();
    Arc::new(Store::new(initial))
}

/// Builds a fresh store from an untyped seed such as a hydration payload.
///
/// # Errors
///
/// Returns a serialization error when the seed does not have the shape of a
/// `PartialState`. Nothing is allocated in that case.
pub fn create_store_from_value(seed: Option<serde_json::Value>) -> Result<StoreHandle> {
    let partial = match seed {
        Some(value) => Some(serde_json::from_value::<PartialState>(value)?),
        None => None,
    };
    Ok(create_store(partial))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FavoritesState, ThemeMode};
    use serde_json::json;

    #[test]
    fn test_create_store_without_seed() {
        let store = create_store(None);
        assert_eq!(store.state(), AppState::default());
    }

    #[test]
    fn test_create_store_with_seed() {
        let store = create_store(Some(PartialState {
            favorites: Some(FavoritesState {
                favorite_ids: vec!["a".into()],
            }),
            ..Default::default()
        }));
        assert_eq!(store.state().favorites.favorite_ids, vec!["a"]);
        assert_eq!(store.state().theme.mode, ThemeMode::Light);
    }

    #[test]
    fn test_stores_are_independent() {
        let first = create_store(None);
        let second = create_store(None);
        first.dispatch(Action::AddFavorite("x".into()));

        assert_ne!(first.id(), second.id());
        assert!(second.state().favorites.favorite_ids.is_empty());
    }

    #[test]
    fn test_create_store_from_value_rejects_bad_shape() {
        let err = create_store_from_value(Some(json!({ "favorites": { "favoriteIds": 7 } })))
            .unwrap_err();
        assert!(err.is_serialization());
    }

    #[test]
    fn test_create_store_from_value() {
        let store =
            create_store_from_value(Some(json!({ "theme": { "mode": "dark" } }))).unwrap();
        assert_eq!(store.state().theme.mode, ThemeMode::Dark);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let store = create_store(None);
        let mut rx = store.subscribe();

        assert!(store.dispatch(Action::ToggleTheme));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().theme.mode, ThemeMode::Dark);
    }

    #[test]
    fn test_unchanged_dispatch_does_not_notify() {
        let store = create_store(None);
        let rx = store.subscribe();

        assert!(!store.dispatch(Action::RemoveFavorite("missing".into())));
        assert!(!rx.has_changed().unwrap());
    }
}
