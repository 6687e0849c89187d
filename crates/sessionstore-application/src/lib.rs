//! Application layer for sessionstore.
//!
//! This crate provides use cases that compose the registry at the
//! server-to-client rendering boundary.

pub mod hydration_usecase;

pub use hydration_usecase::{HydrationUseCase, RenderedPage};
