//! Logistic regression adapter: Implementation of `Classifier` for a JSON model export.
//!
//! The training pipeline fits a scikit-learn `LogisticRegression` (optionally
//! behind a `StandardScaler`) and exports its parameters as JSON. This module
//! loads that export and evaluates it in plain `f64` arithmetic.
//!
//! # Artifact integrity
//!
//! A SHA-256 digest of the artifact can be pinned on the store. When pinned,
//! an artifact whose bytes hash to anything else is refused.
//!
//! # Decision rule
//!
//! `classify` is derived from `score_probability` and the exported threshold,
//! so the class and the probability reported for the same vector can never
//! disagree.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use crate::ports::{Classifier, ModelError, ModelStore};

/// File name looked up when the store is pointed at a directory.
pub const DEFAULT_MODEL_FILE: &str = "diabetes_model.json";

/// Only export format this adapter understands.
const SUPPORTED_FORMAT_VERSION: u32 = 1;

const MODEL_TYPE: &str = "logistic_regression";

/// Model parameters exported by the training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedLogisticModel {
    pub format_version: u32,
    pub model_type: String,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub scaler_mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scaler_scale: Option<Vec<f64>>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

/// Fitted standard scaler: `z = (x - mean) / scale`.
#[derive(Debug, Clone, PartialEq)]
struct Scaler {
    mean: FeatureVector,
    scale: FeatureVector,
}

/// Validated logistic regression model over the eight reading features.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    coefficients: FeatureVector,
    intercept: f64,
    scaler: Option<Scaler>,
    threshold: f64,
    digest: String,
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn to_feature_vector(values: &[f64], what: &str) -> Result<FeatureVector, ModelError> {
    if values.len() != FEATURE_COUNT {
        return Err(ModelError::Invalid(format!(
            "{what} has {} entries, expected {FEATURE_COUNT}",
            values.len()
        )));
    }
    if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
        return Err(ModelError::Invalid(format!(
            "{what}[{pos}] is not a finite number"
        )));
    }
    let mut out = [0.0; FEATURE_COUNT];
    out.copy_from_slice(values);
    Ok(out)
}

impl LogisticModel {
    /// Build a model from an exported parameter set.
    ///
    /// # Errors
    /// Returns `ModelError::Invalid` if the export does not describe a
    /// logistic regression over the expected features in the expected order.
    pub fn from_export(export: ExportedLogisticModel) -> Result<Self, ModelError> {
        Self::from_export_with_digest(export, String::new())
    }

    fn from_export_with_digest(
        export: ExportedLogisticModel,
        digest: String,
    ) -> Result<Self, ModelError> {
        if export.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ModelError::Invalid(format!(
                "Unsupported format_version {} (expected {SUPPORTED_FORMAT_VERSION})",
                export.format_version
            )));
        }
        if export.model_type != MODEL_TYPE {
            return Err(ModelError::Invalid(format!(
                "Unsupported model_type '{}' (expected '{MODEL_TYPE}')",
                export.model_type
            )));
        }

        // Feature order is the model contract; refuse anything reordered.
        if export.feature_names.len() != FEATURE_COUNT
            || export
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .any(|(got, want)| got != want)
        {
            return Err(ModelError::Invalid(format!(
                "feature_names {:?} do not match expected order {:?}",
                export.feature_names, FEATURE_NAMES
            )));
        }

        let coefficients = to_feature_vector(&export.coefficients, "coefficients")?;
        if !export.intercept.is_finite() {
            return Err(ModelError::Invalid("intercept is not a finite number".into()));
        }

        let scaler = match (export.scaler_mean, export.scaler_scale) {
            (Some(mean), Some(scale)) => {
                let mean = to_feature_vector(&mean, "scaler_mean")?;
                let scale = to_feature_vector(&scale, "scaler_scale")?;
                if let Some(pos) = scale.iter().position(|s| *s == 0.0) {
                    return Err(ModelError::Invalid(format!("scaler_scale[{pos}] is zero")));
                }
                Some(Scaler { mean, scale })
            }
            (None, None) => None,
            _ => {
                return Err(ModelError::Invalid(
                    "scaler_mean and scaler_scale must be given together".into(),
                ))
            }
        };

        if !(export.threshold > 0.0 && export.threshold < 1.0) {
            return Err(ModelError::Invalid(format!(
                "threshold {} must lie strictly between 0 and 1",
                export.threshold
            )));
        }

        Ok(Self {
            coefficients,
            intercept: export.intercept,
            scaler,
            threshold: export.threshold,
            digest,
        })
    }

    /// Parse and validate a model from the raw artifact bytes.
    ///
    /// # Errors
    /// Returns `ModelError::Deserialize` for malformed JSON and
    /// `ModelError::Invalid` for inconsistent parameters.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        let export: ExportedLogisticModel = serde_json::from_slice(bytes)?;
        Self::from_export_with_digest(export, sha256_hex(bytes))
    }

    /// Hex SHA-256 of the artifact the model was loaded from (empty when
    /// built directly from an export).
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Whether the export carried a standard scaler.
    #[must_use]
    pub fn is_scaled(&self) -> bool {
        self.scaler.is_some()
    }

    /// Linear decision function `intercept + Σ coef_i * z_i`.
    fn decision_function(&self, features: &FeatureVector) -> f64 {
        let mut z = self.intercept;
        for (i, x) in features.iter().enumerate() {
            let x = match &self.scaler {
                Some(scaler) => (x - scaler.mean[i]) / scaler.scale[i],
                None => *x,
            };
            z += self.coefficients[i] * x;
        }
        z
    }

    fn sigmoid(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }
}

impl Classifier for LogisticModel {
    fn classify(&self, features: &FeatureVector) -> u8 {
        u8::from(self.score_probability(features) >= self.threshold)
    }

    fn score_probability(&self, features: &FeatureVector) -> f64 {
        Self::sigmoid(self.decision_function(features))
    }

    fn decision_threshold(&self) -> f64 {
        self.threshold
    }
}

/// Loads `LogisticModel`s from JSON artifacts on the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct JsonModelStore {
    expected_sha256: Option<String>,
}

impl JsonModelStore {
    /// Create a store without a digest pin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the artifact to hash to the given hex SHA-256 digest.
    #[must_use]
    pub fn with_expected_sha256(mut self, digest: impl Into<String>) -> Self {
        self.expected_sha256 = Some(digest.into().trim().to_ascii_lowercase());
        self
    }

    /// Resolve a file or directory argument to the artifact path.
    #[must_use]
    pub fn resolve_path(path: &Path) -> PathBuf {
        if path.is_dir() {
            path.join(DEFAULT_MODEL_FILE)
        } else {
            path.to_path_buf()
        }
    }
}

impl ModelStore for JsonModelStore {
    type Model = LogisticModel;

    fn load(&self, path: &Path) -> Result<LogisticModel, ModelError> {
        let model_path = Self::resolve_path(path);
        if !model_path.is_file() {
            tracing::error!("Model file not found at {:?}", model_path);
            return Err(ModelError::NotFound(model_path));
        }

        let bytes = fs::read(&model_path)?;
        let actual = sha256_hex(&bytes);

        if let Some(expected) = &self.expected_sha256 {
            if *expected != actual {
                tracing::error!("Model digest mismatch for {:?}", model_path);
                return Err(ModelError::DigestMismatch {
                    expected: expected.clone(),
                    actual,
                });
            }
            tracing::info!("Model digest verified");
        }

        let model = LogisticModel::from_json_bytes(&bytes)?;

        tracing::info!(
            "Loaded model from {:?} (n_features={}, scaled={}, threshold={}, sha256={})",
            model_path,
            FEATURE_COUNT,
            model.is_scaled(),
            model.threshold,
            &actual[..12]
        );

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FIXTURE: &str = "models/diabetes_model.json";

    fn export() -> ExportedLogisticModel {
        ExportedLogisticModel {
            format_version: 1,
            model_type: MODEL_TYPE.to_string(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            coefficients: vec![0.5, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            intercept: -1.0,
            scaler_mean: None,
            scaler_scale: None,
            threshold: 0.5,
        }
    }

    fn write_artifact(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
        file.write_all(content.as_bytes()).expect("Should write");
        file
    }

    #[test]
    fn test_load_fixture() {
        let model = JsonModelStore::new()
            .load(Path::new(FIXTURE))
            .expect("Fixture should load");
        assert_eq!(model.digest().len(), 64);
        assert!(!model.is_scaled());
        assert!((model.decision_threshold() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_from_directory() {
        let model = JsonModelStore::new()
            .load(Path::new("models"))
            .expect("Directory should resolve to the default file");
        assert_eq!(model.digest().len(), 64);
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let err = JsonModelStore::new()
            .load(&dir.path().join("absent.json"))
            .expect_err("Should fail");
        assert!(matches!(err, ModelError::NotFound(_)));

        let err = JsonModelStore::new()
            .load(dir.path())
            .expect_err("Empty directory should fail");
        assert!(matches!(err, ModelError::NotFound(_)));
    }

    #[test]
    fn test_malformed_artifact() {
        let file = write_artifact("{ not json");
        let err = JsonModelStore::new()
            .load(file.path())
            .expect_err("Should fail");
        assert!(matches!(err, ModelError::Deserialize(_)));
    }

    #[test]
    fn test_reordered_features_rejected() {
        let mut reordered = export();
        reordered.feature_names.swap(0, 7);
        let err = LogisticModel::from_export(reordered).expect_err("Should fail");
        assert!(matches!(err, ModelError::Invalid(_)));
    }

    #[test]
    fn test_parameter_checks() {
        let mut short = export();
        short.coefficients.pop();
        assert!(LogisticModel::from_export(short).is_err());

        let mut half_scaler = export();
        half_scaler.scaler_mean = Some(vec![0.0; 8]);
        assert!(LogisticModel::from_export(half_scaler).is_err());

        let mut zero_scale = export();
        zero_scale.scaler_mean = Some(vec![0.0; 8]);
        zero_scale.scaler_scale = Some(vec![1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        assert!(LogisticModel::from_export(zero_scale).is_err());

        let mut bad_threshold = export();
        bad_threshold.threshold = 1.0;
        assert!(LogisticModel::from_export(bad_threshold).is_err());

        let mut wrong_type = export();
        wrong_type.model_type = "random_forest".into();
        assert!(LogisticModel::from_export(wrong_type).is_err());
    }

    #[test]
    fn test_digest_pin() {
        let content = std::fs::read(FIXTURE).expect("Fixture should exist");
        let digest = sha256_hex(&content);

        let pinned = JsonModelStore::new().with_expected_sha256(digest.to_uppercase());
        assert!(pinned.load(Path::new(FIXTURE)).is_ok());

        let wrong = JsonModelStore::new().with_expected_sha256("0".repeat(64));
        let err = wrong.load(Path::new(FIXTURE)).expect_err("Should fail");
        assert!(matches!(err, ModelError::DigestMismatch { .. }));
    }

    #[test]
    fn test_unscaled_probability() {
        let model = LogisticModel::from_export(export()).expect("Should build");
        // z = -1 + 0.5 * 2 + 1.0 * 0 = 0
        let p = model.score_probability(&[2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!((p - 0.5).abs() < 1e-12);
        assert_eq!(model.classify(&[2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]), 1);
        assert_eq!(model.classify(&[0.0; 8]), 0);
    }

    #[test]
    fn test_scaled_probability() {
        let mut scaled = export();
        scaled.scaler_mean = Some(vec![2.0, 100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        scaled.scaler_scale = Some(vec![2.0, 50.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        scaled.intercept = 0.0;
        let model = LogisticModel::from_export(scaled).expect("Should build");
        assert!(model.is_scaled());

        // z = 0.5 * (4 - 2) / 2 + 1.0 * (150 - 100) / 50 = 0.5 + 1.0
        let x = [4.0, 150.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let expected = 1.0 / (1.0 + (-1.5f64).exp());
        assert!((model.score_probability(&x) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_custom_threshold_drives_class() {
        let mut strict = export();
        strict.threshold = 0.9;
        let model = LogisticModel::from_export(strict).expect("Should build");
        let x = [4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]; // z = 1, p ~ 0.73
        assert!(model.score_probability(&x) > 0.5);
        assert_eq!(model.classify(&x), 0);
    }
}
