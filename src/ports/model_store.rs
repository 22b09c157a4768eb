//! Model store port: Trait for loading a serialized classifier.

use std::path::{Path, PathBuf};

use super::Classifier;

/// Errors that can occur while loading a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model artifact not found at {0:?}")]
    NotFound(PathBuf),

    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize model artifact: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    Invalid(String),

    #[error("Model artifact digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },
}

/// Trait for loading a classifier from external storage.
///
/// A store is used once during startup; the model it returns is then held
/// for the lifetime of the process.
pub trait ModelStore {
    /// Concrete model type produced by this store.
    type Model: Classifier;

    /// Load a model from a file or directory path.
    ///
    /// # Errors
    /// Returns `ModelError::NotFound` if nothing exists at `path`, or another
    /// variant if the artifact cannot be read, parsed or validated.
    fn load(&self, path: &Path) -> Result<Self::Model, ModelError>;
}
