pub mod clock;
pub mod config;
pub mod error;
pub mod hydration;
pub mod registry;
pub mod session_id;
pub mod state;
pub mod store;

// Re-export common types
pub use error::{Result, SessionStoreError};
pub use hydration::SerializedState;
pub use registry::{RegistryStats, SessionRegistry};
pub use session_id::{SessionIdProvider, SessionKey};
pub use store::{Store, StoreHandle};
