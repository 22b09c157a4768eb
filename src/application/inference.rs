//! Inference service: Turns a patient reading into a prediction.
//!
//! This service coordinates:
//! - Model availability checks
//! - Reading validation
//! - Feature vector assembly
//! - Classification and probability scoring
//! - Result normalization

use std::sync::Arc;

use crate::domain::{DiabetesLabel, PatientReading, PredictionResult};
use crate::ports::{Classifier, ModelError};
use crate::InferenceError;

/// Model slot of an adapter: loaded once at startup, or the reason it is not.
#[derive(Debug)]
enum ModelSlot<M> {
    Loaded(Arc<M>),
    Unavailable(String),
}

impl<M> Clone for ModelSlot<M> {
    fn clone(&self) -> Self {
        match self {
            Self::Loaded(model) => Self::Loaded(Arc::clone(model)),
            Self::Unavailable(reason) => Self::Unavailable(reason.clone()),
        }
    }
}

/// Stateless request/response adapter over a loaded classifier.
///
/// The model is injected at construction and never mutated, so clones of the
/// adapter can serve concurrent requests without locking.
#[derive(Debug)]
pub struct InferenceAdapter<M>
where
    M: Classifier,
{
    model: ModelSlot<M>,
}

impl<M> Clone for InferenceAdapter<M>
where
    M: Classifier,
{
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
        }
    }
}

impl<M> InferenceAdapter<M>
where
    M: Classifier,
{
    /// Create an adapter over a loaded model.
    pub fn new(model: Arc<M>) -> Self {
        Self {
            model: ModelSlot::Loaded(model),
        }
    }

    /// Create an adapter that refuses every request.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            model: ModelSlot::Unavailable(reason.into()),
        }
    }

    /// Create an adapter from the outcome of a model store load.
    pub fn from_load(loaded: Result<M, ModelError>) -> Self {
        match loaded {
            Ok(model) => Self::new(Arc::new(model)),
            Err(e) => {
                tracing::warn!("Inference disabled: {}", e);
                Self::unavailable(e.to_string())
            }
        }
    }

    /// Whether a model is loaded. The presentation layer uses this to
    /// disable the prediction action.
    #[must_use]
    pub fn is_model_available(&self) -> bool {
        matches!(self.model, ModelSlot::Loaded(_))
    }

    /// Why the model is unavailable, if it is.
    #[must_use]
    pub fn unavailable_reason(&self) -> Option<&str> {
        match &self.model {
            ModelSlot::Loaded(_) => None,
            ModelSlot::Unavailable(reason) => Some(reason.as_str()),
        }
    }

    /// The loaded model, if any.
    #[must_use]
    pub fn model(&self) -> Option<&Arc<M>> {
        match &self.model {
            ModelSlot::Loaded(model) => Some(model),
            ModelSlot::Unavailable(_) => None,
        }
    }

    fn require_model(&self) -> Result<&M, InferenceError> {
        match &self.model {
            ModelSlot::Loaded(model) => Ok(model.as_ref()),
            ModelSlot::Unavailable(reason) => {
                Err(InferenceError::ModelUnavailable(reason.clone()))
            }
        }
    }

    /// Run the classifier on a reading.
    ///
    /// Performs the full request:
    /// 1. Check the model is loaded
    /// 2. Validate the reading (finite, non-negative)
    /// 3. Assemble the positional feature vector
    /// 4. Classify and score
    /// 5. Rescale the probability to a percentage
    ///
    /// # Errors
    /// Returns `ModelUnavailable` when no model is loaded (checked before
    /// anything else) and `InvalidInput` when the reading is rejected.
    pub fn infer(&self, reading: &PatientReading) -> Result<PredictionResult, InferenceError> {
        let model = self.require_model()?;

        reading
            .validate()
            .map_err(|errors| InferenceError::InvalidInput(errors.join(", ")))?;

        let features = reading.to_vector();

        let class = model.classify(&features);
        let label = DiabetesLabel::from_class(class).ok_or_else(|| {
            InferenceError::ModelUnavailable(format!(
                "model returned class {class}, expected 0 or 1"
            ))
        })?;

        let probability = model.score_probability(&features);
        if !probability.is_finite() {
            return Err(InferenceError::InvalidInput(
                "reading drives the model outside its numeric range".to_string(),
            ));
        }

        let result = PredictionResult::new(label, probability);

        tracing::debug!(
            "Inference complete: label={}, risk={:.1}%, band={}",
            result.label,
            result.risk_probability,
            result.risk_band()
        );

        Ok(result)
    }

    /// Parse `(field, text)` pairs and run the classifier on them.
    ///
    /// # Errors
    /// Returns `ModelUnavailable` when no model is loaded, otherwise
    /// `InvalidInput` for missing or non-numeric fields.
    pub fn infer_fields<'a, I>(&self, pairs: I) -> Result<PredictionResult, InferenceError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.require_model()?;

        let reading = PatientReading::parse_fields(pairs)
            .map_err(|errors| InferenceError::InvalidInput(errors.join(", ")))?;
        self.infer(&reading)
    }
}
