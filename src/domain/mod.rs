//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O. All types are serializable and validate
//! their own invariants.

mod prediction;
mod reading;

pub use prediction::{DiabetesLabel, PredictionResult, RiskBand};
pub use reading::{
    feature_index, FeatureVector, FieldSpec, PatientReading, FEATURE_COUNT, FEATURE_NAMES,
    FIELD_SPECS,
};
