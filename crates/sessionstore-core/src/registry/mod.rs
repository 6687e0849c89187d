//! Session store registry module.
//!
//! # Module Structure
//!
//! - `manager`: The registry service and its builder (`SessionRegistry`)
//! - `entry`: Per-session bookkeeping (`StoreEntry`, `SessionSummary`)
//! - `sweeper`: Age-based eviction (`SessionRegistry::sweep`)
//! - `serializer`: Hydration payload production (`SessionRegistry::serialize`)
//! - `diagnostics`: Occupancy statistics (`RegistryStats`)

mod diagnostics;
mod entry;
mod manager;
mod serializer;
mod sweeper;

pub use diagnostics::RegistryStats;
pub use entry::{SessionSummary, StoreEntry};
pub use manager::{SessionRegistry, SessionRegistryBuilder};
pub use serializer::{project_state, serialize_state};
