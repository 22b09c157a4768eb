//! Patient reading types for diabetes risk prediction.
//!
//! The eight fields follow the Pima Indians Diabetes dataset columns that the
//! classifier was trained on. The model consumes an unlabeled positional
//! vector, so the field order here is part of the model contract.

use serde::{Deserialize, Serialize};

/// Number of features the classifier consumes.
pub const FEATURE_COUNT: usize = 8;

/// Positional feature vector handed to the classifier.
pub type FeatureVector = [f64; FEATURE_COUNT];

/// Canonical feature names, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "pregnancies",
    "glucose",
    "blood_pressure",
    "skin_thickness",
    "insulin",
    "bmi",
    "diabetes_pedigree_function",
    "age",
];

/// One set of health metrics entered for a single assessment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientReading {
    /// Number of times pregnant
    pub pregnancies: u32,

    /// Plasma glucose concentration in mg/dL
    pub glucose: f64,

    /// Diastolic blood pressure in mmHg
    pub blood_pressure: f64,

    /// Triceps skin fold thickness in mm
    pub skin_thickness: f64,

    /// 2-hour serum insulin in μU/mL
    pub insulin: f64,

    /// Body mass index in kg/m²
    pub bmi: f64,

    /// Genetic predisposition score
    pub diabetes_pedigree_function: f64,

    /// Age in years
    pub age: u32,
}

impl PatientReading {
    /// Convert the reading to the positional vector the model expects.
    /// Order: pregnancies, glucose, blood_pressure, skin_thickness, insulin, bmi, dpf, age
    #[must_use]
    pub fn to_vector(&self) -> FeatureVector {
        [
            f64::from(self.pregnancies),
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            f64::from(self.age),
        ]
    }

    /// Build a reading from a positional vector.
    ///
    /// # Errors
    /// Returns error if the vector length is not 8 or an integer position
    /// (pregnancies, age) does not hold a whole non-negative number.
    pub fn from_vector(v: &[f64]) -> Result<Self, String> {
        if v.len() != FEATURE_COUNT {
            return Err(format!(
                "Expected {FEATURE_COUNT} features, got {}",
                v.len()
            ));
        }

        Ok(Self {
            pregnancies: whole_count(&FIELD_SPECS[0], v[0])?,
            glucose: v[1],
            blood_pressure: v[2],
            skin_thickness: v[3],
            insulin: v[4],
            bmi: v[5],
            diabetes_pedigree_function: v[6],
            age: whole_count(&FIELD_SPECS[7], v[7])?,
        })
    }

    /// Parse a reading from `(field name, text)` pairs, as entered in a form
    /// or passed on the command line.
    ///
    /// Names are matched case-insensitively, ignoring `_`, `-` and spaces, so
    /// `blood_pressure`, `BloodPressure` and `bp` all address the same field.
    ///
    /// # Errors
    /// Returns every problem found: unknown names, missing or repeated
    /// fields, values that are not numbers and fractional counts.
    pub fn parse_fields<'a, I>(pairs: I) -> Result<Self, Vec<String>>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut values: [Option<f64>; FEATURE_COUNT] = [None; FEATURE_COUNT];
        let mut reported = [false; FEATURE_COUNT];
        let mut seen = [false; FEATURE_COUNT];
        let mut repeated = [false; FEATURE_COUNT];
        let mut errors = Vec::new();

        for (name, text) in pairs {
            let Some(idx) = feature_index(name) else {
                errors.push(format!("Unknown field '{}'", name.trim()));
                continue;
            };
            let spec = &FIELD_SPECS[idx];
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            // Aliases share a slot: `bp` and `blood_pressure` collide here.
            if seen[idx] {
                if !repeated[idx] {
                    errors.push(format!("{}: given more than once", spec.label));
                    repeated[idx] = true;
                }
                continue;
            }
            seen[idx] = true;

            match text.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    if spec.integer && value.fract() != 0.0 {
                        errors.push(format!("{}: must be a whole number", spec.label));
                        reported[idx] = true;
                    } else {
                        values[idx] = Some(value);
                    }
                }
                _ => {
                    errors.push(format!("{}: '{}' is not a number", spec.label, text));
                    reported[idx] = true;
                }
            }
        }

        for (idx, slot) in values.iter().enumerate() {
            if slot.is_none() && !reported[idx] {
                errors.push(format!("{}: value is required", FIELD_SPECS[idx].label));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let vector: Vec<f64> = values.iter().map(|v| v.unwrap_or_default()).collect();
        Self::from_vector(&vector).map_err(|e| vec![e])
    }

    /// Check that every field is finite and non-negative.
    ///
    /// No medical-plausibility checks are made here; widget bounds belong to
    /// the presentation layer (see [`FieldSpec::check`]).
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let errors: Vec<String> = self
            .to_vector()
            .iter()
            .zip(FIELD_SPECS.iter())
            .filter_map(|(value, spec)| {
                if !value.is_finite() {
                    Some(format!("{}: value must be a finite number", spec.label))
                } else if *value < 0.0 {
                    Some(format!("{}: {} must not be negative", spec.label, value))
                } else {
                    None
                }
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Short `(name, formatted value)` rows shown alongside a result.
    #[must_use]
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Pregnancies", self.pregnancies.to_string()),
            ("Glucose", format!("{:.1}", self.glucose)),
            ("Blood Pressure", format!("{:.1}", self.blood_pressure)),
            ("Skin Thickness", format!("{:.1}", self.skin_thickness)),
            ("Insulin", format!("{:.1}", self.insulin)),
            ("BMI", format!("{:.1}", self.bmi)),
            ("DPF", format!("{:.3}", self.diabetes_pedigree_function)),
            ("Age", self.age.to_string()),
        ]
    }
}

fn whole_count(spec: &FieldSpec, value: f64) -> Result<u32, String> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(format!("{}: must be a whole number", spec.label));
    }
    if value < 0.0 {
        return Err(format!("{}: {} must not be negative", spec.label, value));
    }
    if value > f64::from(u32::MAX) {
        return Err(format!("{}: {} is too large", spec.label, value));
    }
    Ok(value as u32)
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Resolve a user-supplied field name to its vector position.
#[must_use]
pub fn feature_index(name: &str) -> Option<usize> {
    let wanted = normalize_name(name);
    match wanted.as_str() {
        "dpf" | "pedigree" => return Some(6),
        "bp" => return Some(2),
        _ => {}
    }
    FEATURE_NAMES
        .iter()
        .position(|canonical| normalize_name(canonical) == wanted)
}

/// Input widget description for one reading field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Canonical snake_case name (matches `FEATURE_NAMES`)
    pub name: &'static str,
    /// Label shown next to the input
    pub label: &'static str,
    /// Placeholder hint with unit and range
    pub hint: &'static str,
    /// Inclusive lower bound
    pub min: f64,
    /// Inclusive upper bound, enforced only when configured
    pub max: f64,
    /// Whether the field only accepts whole numbers
    pub integer: bool,
}

impl FieldSpec {
    /// Check a value against the widget bounds.
    ///
    /// # Errors
    /// Returns a message naming the violated bound.
    pub fn check(&self, value: f64, enforce_upper: bool) -> Result<(), String> {
        if value < self.min {
            return Err(format!("{}: must be at least {}", self.label, self.min));
        }
        if enforce_upper && value > self.max {
            return Err(format!(
                "{}: value must be between {} and {}",
                self.label, self.min, self.max
            ));
        }
        Ok(())
    }
}

/// Widget bounds for each field, in vector order.
pub static FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        name: "pregnancies",
        label: "Pregnancies",
        hint: "count (0-20)",
        min: 0.0,
        max: 20.0,
        integer: true,
    },
    FieldSpec {
        name: "glucose",
        label: "Glucose",
        hint: "mg/dL (0-300)",
        min: 0.0,
        max: 300.0,
        integer: false,
    },
    FieldSpec {
        name: "blood_pressure",
        label: "Blood Pressure",
        hint: "mmHg diastolic (0-200)",
        min: 0.0,
        max: 200.0,
        integer: false,
    },
    FieldSpec {
        name: "skin_thickness",
        label: "Skin Thickness",
        hint: "mm triceps fold (0-100)",
        min: 0.0,
        max: 100.0,
        integer: false,
    },
    FieldSpec {
        name: "insulin",
        label: "Insulin",
        hint: "μU/mL 2-hour serum (0-1000)",
        min: 0.0,
        max: 1000.0,
        integer: false,
    },
    FieldSpec {
        name: "bmi",
        label: "BMI",
        hint: "kg/m² (0-70)",
        min: 0.0,
        max: 70.0,
        integer: false,
    },
    FieldSpec {
        name: "diabetes_pedigree_function",
        label: "Pedigree Function",
        hint: "genetic score (0-3)",
        min: 0.0,
        max: 3.0,
        integer: false,
    },
    FieldSpec {
        name: "age",
        label: "Age",
        hint: "years (0-120)",
        min: 0.0,
        max: 120.0,
        integer: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_reading() -> PatientReading {
        PatientReading {
            pregnancies: 6,
            glucose: 148.0,
            blood_pressure: 72.0,
            skin_thickness: 35.0,
            insulin: 0.0,
            bmi: 33.6,
            diabetes_pedigree_function: 0.627,
            age: 50,
        }
    }

    #[test]
    fn test_vector_order() {
        let v = reference_reading().to_vector();
        assert_eq!(v, [6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0]);
    }

    #[test]
    fn test_from_vector() {
        let reading = PatientReading::from_vector(&[6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0])
            .expect("Should parse");
        assert_eq!(reading, reference_reading());

        assert!(PatientReading::from_vector(&[1.0; 7]).is_err());
        assert!(PatientReading::from_vector(&[1.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
        assert!(PatientReading::from_vector(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0]).is_err());
    }

    #[test]
    fn test_field_specs_follow_vector_order() {
        for (spec, name) in FIELD_SPECS.iter().zip(FEATURE_NAMES.iter()) {
            assert_eq!(spec.name, *name);
        }
    }

    #[test]
    fn test_validation() {
        assert!(reference_reading().validate().is_ok());

        let zeros = PatientReading::from_vector(&[0.0; FEATURE_COUNT]).expect("Should parse");
        assert!(zeros.validate().is_ok());

        let invalid = PatientReading {
            glucose: -1.0,
            bmi: f64::NAN,
            ..reference_reading()
        };
        let errors = invalid.validate().expect_err("Should reject");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_parse_fields() {
        let pairs = [
            ("Pregnancies", "6"),
            ("glucose", "148"),
            ("BloodPressure", "72"),
            ("skin-thickness", "35"),
            ("insulin", "0"),
            ("BMI", "33.6"),
            ("dpf", "0.627"),
            ("age", " 50 "),
        ];
        let reading = PatientReading::parse_fields(pairs).expect("Should parse");
        assert_eq!(reading, reference_reading());
    }

    #[test]
    fn test_parse_fields_reports_every_problem() {
        let pairs = [
            ("pregnancies", "2.5"),
            ("glucose", "abc"),
            ("blood_pressure", ""),
            ("weight", "80"),
        ];
        let errors = PatientReading::parse_fields(pairs).expect_err("Should reject");

        assert!(errors.iter().any(|e| e.contains("Pregnancies") && e.contains("whole")));
        assert!(errors.iter().any(|e| e.contains("Glucose") && e.contains("not a number")));
        assert!(errors.iter().any(|e| e.contains("Unknown field 'weight'")));
        assert!(errors.iter().any(|e| e.contains("Blood Pressure") && e.contains("required")));
        // skin thickness, insulin, bmi, pedigree, age missing + the three above + unknown
        assert_eq!(errors.len(), 9);
    }

    #[test]
    fn test_parse_fields_rejects_repeated_field() {
        let mut pairs: Vec<(&str, &str)> = FEATURE_NAMES.iter().map(|n| (*n, "1")).collect();
        pairs.push(("glucose", "190"));
        pairs.push(("glucose", "90"));
        pairs.push(("bp", "80"));

        let errors = PatientReading::parse_fields(pairs).expect_err("Should reject");
        assert_eq!(
            errors,
            vec![
                "Glucose: given more than once".to_string(),
                "Blood Pressure: given more than once".to_string(),
            ]
        );
    }

    #[test]
    fn test_parse_fields_rejects_non_finite() {
        let mut pairs: Vec<(&str, &str)> = FEATURE_NAMES.iter().map(|n| (*n, "1")).collect();
        pairs[1].1 = "inf";
        let errors = PatientReading::parse_fields(pairs).expect_err("Should reject");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_json_requires_every_field() {
        let missing_age = r#"{"pregnancies":1,"glucose":85,"blood_pressure":66,
            "skin_thickness":29,"insulin":0,"bmi":26.6,"diabetes_pedigree_function":0.351}"#;
        assert!(serde_json::from_str::<PatientReading>(missing_age).is_err());
    }

    #[test]
    fn test_field_bounds() {
        let glucose = &FIELD_SPECS[1];
        assert!(glucose.check(120.0, true).is_ok());
        assert!(glucose.check(-0.1, false).is_err());
        assert!(glucose.check(350.0, true).is_err());
        assert!(glucose.check(350.0, false).is_ok());
    }

    #[test]
    fn test_summary_formatting() {
        let summary = reference_reading().summary();
        assert_eq!(summary[0], ("Pregnancies", "6".to_string()));
        assert_eq!(summary[5], ("BMI", "33.6".to_string()));
        assert_eq!(summary[6], ("DPF", "0.627".to_string()));
    }
}
