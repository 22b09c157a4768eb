//! Classifier port: Trait for the pre-trained diabetes model.
//!
//! This trait abstracts the concrete model format from the application logic.
//! The adapter only needs the two capabilities a fitted binary classifier
//! exposes: a hard class decision and the positive-class probability.

use crate::domain::FeatureVector;

/// Capability surface of a loaded binary classifier.
///
/// Implementations must be immutable after loading so a single instance can
/// be shared across requests without locking.
pub trait Classifier: Send + Sync {
    /// Predict the class of a feature vector.
    ///
    /// # Returns
    /// `1` for the positive (diabetic) class, `0` otherwise.
    fn classify(&self, features: &FeatureVector) -> u8;

    /// Probability mass the model assigns to class 1, in [0, 1].
    fn score_probability(&self, features: &FeatureVector) -> f64;

    /// Probability at or above which `classify` returns 1.
    fn decision_threshold(&self) -> f64 {
        0.5
    }
}

impl<C: Classifier + ?Sized> Classifier for std::sync::Arc<C> {
    fn classify(&self, features: &FeatureVector) -> u8 {
        (**self).classify(features)
    }

    fn score_probability(&self, features: &FeatureVector) -> f64 {
        (**self).score_probability(features)
    }

    fn decision_threshold(&self) -> f64 {
        (**self).decision_threshold()
    }
}
