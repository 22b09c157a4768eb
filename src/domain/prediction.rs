//! Prediction result types.
//!
//! Represents the normalized output of the diabetes classifier.

use serde::{Deserialize, Serialize};

/// Predicted class of the binary classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiabetesLabel {
    /// Positive class (label 1)
    Diabetic,
    /// Negative class (label 0)
    NonDiabetic,
}

impl DiabetesLabel {
    /// Map a raw model class to a label. Only 0 and 1 are valid.
    #[must_use]
    pub fn from_class(class: u8) -> Option<Self> {
        match class {
            1 => Some(Self::Diabetic),
            0 => Some(Self::NonDiabetic),
            _ => None,
        }
    }

    /// Raw class value the label came from.
    #[must_use]
    pub fn class(&self) -> u8 {
        match self {
            Self::Diabetic => 1,
            Self::NonDiabetic => 0,
        }
    }

    /// Headline shown above the label.
    #[must_use]
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Diabetic => "High Risk Detected",
            Self::NonDiabetic => "Low Risk Detected",
        }
    }

    /// Follow-up guidance shown with a result.
    #[must_use]
    pub fn guidance(&self) -> &'static [&'static str] {
        match self {
            Self::Diabetic => &[
                "Consult with a healthcare provider immediately",
                "Get comprehensive diabetes screening",
                "Monitor blood sugar levels regularly",
                "Consider lifestyle modifications",
            ],
            Self::NonDiabetic => &[
                "Maintain a healthy diet",
                "Exercise regularly",
                "Monitor your health annually",
                "Keep BMI in normal range",
            ],
        }
    }
}

impl std::fmt::Display for DiabetesLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Diabetic => write!(f, "DIABETIC"),
            Self::NonDiabetic => write!(f, "NON-DIABETIC"),
        }
    }
}

/// Qualitative band of the risk gauge. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskBand {
    /// 0-25%
    Low,
    /// 25-50%
    Moderate,
    /// 50-75%
    Elevated,
    /// 75-100%
    High,
}

impl RiskBand {
    /// All bands in gauge order.
    pub const ALL: [RiskBand; 4] = [Self::Low, Self::Moderate, Self::Elevated, Self::High];

    /// Band for a percentage in [0, 100].
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage < 25.0 {
            Self::Low
        } else if percentage < 50.0 {
            Self::Moderate
        } else if percentage < 75.0 {
            Self::Elevated
        } else {
            Self::High
        }
    }

    /// Percentage range covered by the band.
    #[must_use]
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Low => (0.0, 25.0),
            Self::Moderate => (25.0, 50.0),
            Self::Elevated => (50.0, 75.0),
            Self::High => (75.0, 100.0),
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (134, 239, 172),     // Light green (#86EFAC)
            Self::Moderate => (250, 204, 21), // Yellow (#FACC15)
            Self::Elevated => (251, 146, 60), // Orange (#FB923C)
            Self::High => (239, 68, 68),      // Red (#EF4444)
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::Elevated => write!(f, "ELEVATED"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Normalized classifier output for one reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted class
    pub label: DiabetesLabel,

    /// Positive-class probability as a percentage (0.0 to 100.0)
    pub risk_probability: f64,
}

impl PredictionResult {
    /// Create a result from a label and a positive-class probability in [0, 1].
    #[must_use]
    pub fn new(label: DiabetesLabel, probability: f64) -> Self {
        Self {
            label,
            risk_probability: probability.clamp(0.0, 1.0) * 100.0,
        }
    }

    /// Probability as a fraction in [0, 1].
    #[must_use]
    pub fn probability_fraction(&self) -> f64 {
        self.risk_probability / 100.0
    }

    /// Gauge band of the risk percentage.
    #[must_use]
    pub fn risk_band(&self) -> RiskBand {
        RiskBand::from_percentage(self.risk_probability)
    }
}

impl std::fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:.1}%)", self.label, self.risk_probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_class() {
        assert_eq!(DiabetesLabel::from_class(1), Some(DiabetesLabel::Diabetic));
        assert_eq!(DiabetesLabel::from_class(0), Some(DiabetesLabel::NonDiabetic));
        assert_eq!(DiabetesLabel::from_class(2), None);
        assert_eq!(DiabetesLabel::Diabetic.class(), 1);
    }

    #[test]
    fn test_risk_band_boundaries() {
        assert_eq!(RiskBand::from_percentage(0.0), RiskBand::Low);
        assert_eq!(RiskBand::from_percentage(24.9), RiskBand::Low);
        assert_eq!(RiskBand::from_percentage(25.0), RiskBand::Moderate);
        assert_eq!(RiskBand::from_percentage(50.0), RiskBand::Elevated);
        assert_eq!(RiskBand::from_percentage(75.0), RiskBand::High);
        assert_eq!(RiskBand::from_percentage(100.0), RiskBand::High);
    }

    #[test]
    fn test_result_scales_to_percentage() {
        let result = PredictionResult::new(DiabetesLabel::Diabetic, 0.7229);
        assert!((result.risk_probability - 72.29).abs() < 1e-9);
        assert!((result.probability_fraction() - 0.7229).abs() < 1e-12);
        assert_eq!(result.risk_band(), RiskBand::Elevated);
        assert_eq!(result.to_string(), "DIABETIC (72.3%)");
    }

    #[test]
    fn test_result_clamps_probability() {
        let result = PredictionResult::new(DiabetesLabel::NonDiabetic, -0.2);
        assert_eq!(result.risk_probability, 0.0);
        let result = PredictionResult::new(DiabetesLabel::Diabetic, 1.5);
        assert_eq!(result.risk_probability, 100.0);
    }

    #[test]
    fn test_serialized_label_names() {
        let json = serde_json::to_string(&DiabetesLabel::NonDiabetic).expect("Should serialize");
        assert_eq!(json, "\"NON_DIABETIC\"");
    }
}
