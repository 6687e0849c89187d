//! Hydration use case.
//!
//! Wires a `SessionRegistry` into the two halves of a server-rendered page:
//! the server pass that produces a payload, and the client mount that
//! consumes it.

use anyhow::{Context, Result};
use serde::Serialize;
use sessionstore_core::{SerializedState, SessionKey, SessionRegistry, StoreHandle};
use std::sync::Arc;

/// Output of one server render pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    /// Session the render ran under
    pub session: SessionKey,
    /// Payload for the client, `None` when serialization was not possible
    pub payload: Option<SerializedState>,
}

/// Use case coordinating store lookup, serialization, and hydration.
pub struct HydrationUseCase {
    registry: Arc<SessionRegistry>,
}

impl HydrationUseCase {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Runs one server render pass.
    ///
    /// The session key is resolved once, so `render` and the serializer see
    /// the same store even with a provider that mints a key per call.
    ///
    /// # Errors
    ///
    /// Returns an error if the store for the render cannot be constructed.
    pub fn server_render<F>(&self, render: F) -> Result<RenderedPage>
    where
        F: FnOnce(&StoreHandle),
    {
        let session = self.registry.current_session();
        let store = self
            .registry
            .get_store_for(&session)
            .with_context(|| format!("Failed to initialize store for session {}", session))?;

        render(&store);

        let payload = self.registry.serialize_for(&session);
        if payload.is_none() {
            tracing::warn!(
                target: "session_serializer",
                session = %session,
                "Render produced no hydration payload"
            );
        }

        Ok(RenderedPage { session, payload })
    }

    /// Mounts the client store, seeding it from `payload` when this session
    /// has no store yet.
    ///
    /// A payload that is not valid JSON is logged and skipped; the store
    /// then starts from the demo seed.
    ///
    /// # Errors
    ///
    /// Returns an error if store construction fails, e.g. the payload is
    /// valid JSON but not a valid state shape.
    pub fn client_mount(&self, payload: Option<&SerializedState>) -> Result<StoreHandle> {
        let session = self.registry.current_session();
        if payload.is_some() && self.registry.contains(&session) {
            tracing::debug!(
                target: "session_registry",
                session = %session,
                "Store already mounted, discarding hydration payload"
            );
            return self
                .registry
                .get_store_for(&session)
                .context("Failed to resolve client store");
        }

        if let Some(payload) = payload
            && let Err(e) = self.registry.hydrate(payload)
        {
            tracing::warn!(
                target: "session_registry",
                error = %e,
                "Ignoring unparseable hydration payload"
            );
        }

        self.registry
            .get_store_for(&session)
            .context("Failed to initialize client store")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sessionstore_core::clock::ManualClock;
    use sessionstore_core::session_id::{BrowserSessionIdProvider, RequestSessionIdProvider};
    use sessionstore_core::state::{Action, AppState, ThemeMode};

    fn server_usecase() -> HydrationUseCase {
        let clock = Arc::new(ManualClock::new(0));
        let registry = SessionRegistry::builder()
            .with_clock(clock.clone())
            .with_session_ids(Arc::new(RequestSessionIdProvider::with_clock(clock)))
            .init()
            .unwrap();
        HydrationUseCase::new(registry)
    }

    fn client_usecase() -> HydrationUseCase {
        let clock = Arc::new(ManualClock::new(0));
        let registry = SessionRegistry::builder()
            .with_clock(clock.clone())
            .with_session_ids(Arc::new(BrowserSessionIdProvider::with_clock(clock)))
            .init()
            .unwrap();
        HydrationUseCase::new(registry)
    }

    #[test]
    fn test_server_render_serializes_rendered_store() {
        let server = server_usecase();

        let page = server
            .server_render(|store| {
                store.dispatch(Action::ClearFavorites);
                store.dispatch(Action::AddFavorite("a".into()));
                store.dispatch(Action::AddFavorite("b".into()));
                store.dispatch(Action::SetTheme(ThemeMode::Dark));
            })
            .unwrap();

        assert!(page.session.as_str().starts_with("server_0_"));
        let parsed = page.payload.unwrap().parse().unwrap();
        assert_eq!(parsed["favorites"]["favoriteIds"], serde_json::json!(["a", "b"]));
        assert_eq!(parsed["theme"]["mode"], "dark");
        assert_eq!(server.registry().len(), 1);
    }

    #[test]
    fn test_client_mount_uses_server_payload() {
        let server = server_usecase();
        let page = server
            .server_render(|store| {
                store.dispatch(Action::AddFavorite("7".into()));
            })
            .unwrap();

        let client = client_usecase();
        let store = client.client_mount(page.payload.as_ref()).unwrap();

        assert_eq!(store.state().favorites.favorite_ids, vec!["1", "3", "7"]);
    }

    #[test]
    fn test_client_mount_without_payload_uses_demo_seed() {
        let client = client_usecase();
        let store = client.client_mount(None).unwrap();
        assert_eq!(store.state(), AppState::demo());
    }

    #[test]
    fn test_client_mount_skips_invalid_json() {
        let client = client_usecase();
        let store = client
            .client_mount(Some(&SerializedState::new("<html>")))
            .unwrap();
        assert_eq!(store.state(), AppState::demo());
    }

    #[test]
    fn test_client_mount_payload_only_applies_to_first_mount() {
        let client = client_usecase();
        let first = client.client_mount(None).unwrap();
        let payload = SerializedState::new(r#"{"theme":{"mode":"dark"}}"#);

        let second = client.client_mount(Some(&payload)).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.state().theme.mode, ThemeMode::Light);
        assert!(!client.registry().hydration().is_pending());
    }

    #[test]
    fn test_client_mount_reports_bad_shape() {
        let client = client_usecase();
        let payload = SerializedState::new(r#"{"favorites":"oops"}"#);
        assert!(client.client_mount(Some(&payload)).is_err());
        assert!(client.registry().is_empty());
    }
}
