//! Background execution for sessionstore.
//!
//! - `maintenance`: periodic sweep and stats logging
//! - `tracing_layer`: forwards registry log events to a channel

pub mod maintenance;
pub mod tracing_layer;

pub use maintenance::MaintenanceScheduler;
pub use tracing_layer::{RegistryEvent, RegistryEventLayer};
