//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the application and the model artifact it consumes.

mod classifier;
mod model_store;

pub use classifier::Classifier;
pub use model_store::{ModelError, ModelStore};
