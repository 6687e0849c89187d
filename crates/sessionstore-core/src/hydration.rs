//! Server-to-client hydration handoff.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// JSON text carrying the allow-listed slices of a server-side store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializedState(String);

impl SerializedState {
    pub fn new(json: impl Into<String>) -> Self {
        Self(json.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the payload back into a JSON value.
    pub fn parse(&self) -> Result<Value> {
        Ok(serde_json::from_str(&self.0)?)
    }
}

impl fmt::Display for SerializedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single-use slot holding the server-provided seed for the next store.
///
/// `take()` hands the value out at most once; a later `offer()` refills it.
#[derive(Debug, Default)]
pub struct HydrationHandoff {
    payload: Mutex<Option<Value>>,
}

impl HydrationHandoff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` as the pending payload, replacing any unconsumed one.
    pub fn offer(&self, value: Value) {
        let mut payload = self.payload.lock().unwrap_or_else(PoisonError::into_inner);
        if payload.is_some() {
            tracing::debug!(target: "session_registry", "Replacing unconsumed hydration payload");
        }
        *payload = Some(value);
    }

    /// Parses `serialized` and stores it as the pending payload.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the text is not valid JSON; the slot
    /// is left unchanged.
    pub fn offer_serialized(&self, serialized: &SerializedState) -> Result<()> {
        let value = serialized.parse()?;
        self.offer(value);
        Ok(())
    }

    /// Removes and returns the pending payload.
    pub fn take(&self) -> Option<Value> {
        self.payload
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn is_pending(&self) -> bool {
        self.payload
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
