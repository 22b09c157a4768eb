//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external formats:
//! - `logistic`: JSON logistic regression export behind `Classifier`
//! - `sanitize`: redaction of reading values in log output

pub mod logistic;
pub mod sanitize;
