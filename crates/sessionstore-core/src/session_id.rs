//! Session identifier resolution.
//!
//! The composition root picks a `SessionIdProvider` for its execution context:
//! a browser-like client keeps one key for its lifetime, a server render pass
//! gets a fresh key on every call.

use crate::clock::{Clock, SystemClock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Key prefix for client-side sessions.
pub const BROWSER_SESSION_PREFIX: &str = "session";
/// Key prefix for server-side render passes.
pub const REQUEST_SESSION_PREFIX: &str = "server";

/// Opaque string identifying one logical session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Generates `<prefix>_<millis>_<random fraction>`.
    pub fn generate(prefix: &str, now_millis: i64) -> Self {
        Self(format!("{}_{}_{}", prefix, now_millis, rand::random::<f64>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Where the registry is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    Client,
    Server,
}

/// Strategy for deriving the current session's key.
pub trait SessionIdProvider: Send + Sync {
    /// Returns the key for the session making the current call.
    fn session_id(&self) -> SessionKey;

    fn context(&self) -> ExecutionContext;
}

/// Client-side provider: generates a key once and reuses it.
pub struct BrowserSessionIdProvider {
    slot: OnceLock<SessionKey>,
    clock: Arc<dyn Clock>,
}

impl BrowserSessionIdProvider {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: OnceLock::new(),
            clock,
        }
    }
}

impl Default for BrowserSessionIdProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionIdProvider for BrowserSessionIdProvider {
    fn session_id(&self) -> SessionKey {
        self.slot
            .get_or_init(|| {
                let key = SessionKey::generate(BROWSER_SESSION_PREFIX, self.clock.now_millis());
                tracing::debug!(target: "session_registry", session = %key, "Generated client session id");
                key
            })
            .clone()
    }

    fn context(&self) -> ExecutionContext {
        ExecutionContext::Client
    }
}

/// Server-side provider: a brand-new key on every call.
///
/// No per-request storage is assumed, so every call is its own session.
pub struct RequestSessionIdProvider {
    clock: Arc<dyn Clock>,
}

impl RequestSessionIdProvider {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for RequestSessionIdProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionIdProvider for RequestSessionIdProvider {
    fn session_id(&self) -> SessionKey {
        SessionKey::generate(REQUEST_SESSION_PREFIX, self.clock.now_millis())
    }

    fn context(&self) -> ExecutionContext {
        ExecutionContext::Server
    }
}

/// Provider for callers that already own a durable session identity
/// (for example a cookie read by the request handler).
pub struct FixedSessionIdProvider {
    key: SessionKey,
    context: ExecutionContext,
}

impl FixedSessionIdProvider {
    pub fn new(key: impl Into<SessionKey>, context: ExecutionContext) -> Self {
        Self {
            key: key.into(),
            context,
        }
    }
}

impl SessionIdProvider for FixedSessionIdProvider {
    fn session_id(&self) -> SessionKey {
        self.key.clone()
    }

    fn context(&self) -> ExecutionContext {
        self.context
    }
}
