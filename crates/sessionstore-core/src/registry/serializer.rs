//! Projection of store state into a hydration payload.

use super::manager::SessionRegistry;
use crate::error::Result;
use crate::hydration::SerializedState;
use crate::session_id::SessionKey;
use crate::state::{AppState, SliceName};
use serde_json::{Map, Value};

/// Copies only the `slices` of `state` into a new JSON object.
pub fn project_state(state: &AppState, slices: &[SliceName]) -> Result<Value> {
    let mut full = match serde_json::to_value(state)? {
        Value::Object(map) => map,
        other => return Ok(other),
    };

    let mut projected = Map::new();
    for slice in slices {
        if let Some(value) = full.remove(slice.key()) {
            projected.insert(slice.key().to_string(), value);
        }
    }
    Ok(Value::Object(projected))
}

/// Projects and JSON-encodes `state`.
pub fn serialize_state(state: &AppState, slices: &[SliceName]) -> Result<SerializedState> {
    let projected = project_state(state, slices)?;
    Ok(SerializedState::new(serde_json::to_string(&projected)?))
}

impl SessionRegistry {
    /// Serializes the current session's store for transfer to the client.
    ///
    /// Creates the store if it does not exist yet. Returns `None` when no
    /// payload can be produced; callers treat that as "nothing to hydrate".
    pub fn serialize(&self) -> Option<SerializedState> {
        let key = self.current_session();
        self.serialize_for(&key)
    }

    /// Same as `serialize`, for an explicit session key.
    pub fn serialize_for(&self, key: &SessionKey) -> Option<SerializedState> {
        let store = match self.get_store_for(key) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(
                    target: "session_serializer",
                    session = %key,
                    error = %e,
                    "Cannot resolve store for serialization"
                );
                return None;
            }
        };

        match serialize_state(&store.state(), &self.config.hydrated_slices) {
            Ok(serialized) => Some(serialized),
            Err(e) => {
                tracing::warn!(
                    target: "session_serializer",
                    session = %key,
                    error = %e,
                    "Failed to serialize session state"
                );
                None
            }
        }
    }
}
