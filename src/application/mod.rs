//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use case of the application: one reading in, one prediction out.

mod inference;

pub use inference::InferenceAdapter;
