//! # Glucosense
//!
//! Local diabetes risk assessment from eight routine health metrics.
//!
//! This crate provides:
//! - A typed patient reading and the fixed feature order the model consumes
//! - Inference against a pre-trained logistic regression artifact
//! - Terminal UI for entering readings and reviewing the predicted risk
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PatientReading, PredictionResult)
//! - `ports`: Trait definitions for the model and its store
//! - `adapters`: Concrete implementations (JSON logistic model, log redaction)
//! - `application`: The inference use case
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod tui;

pub use application::InferenceAdapter;
pub use domain::{DiabetesLabel, PatientReading, PredictionResult, RiskBand};

/// Result type for Glucosense operations
pub type Result<T> = std::result::Result<T, GlucosenseError>;

/// Failure of a single inference request.
///
/// These are the only two ways `infer` can fail. Both are terminal for the
/// request: the artifact must be supplied or the input corrected first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    #[error("Model not available: {0}")]
    ModelUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Main error type for Glucosense
#[derive(Debug, thiserror::Error)]
pub enum GlucosenseError {
    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("Model store failed: {0}")]
    Model(#[from] ports::ModelError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
