//! User input collection
//!
//! Measurements arrive in one of two shapes: a single comma separated line
//! of eight numbers, or a form with one field per measurement. Both end up
//! as a `FeatureVector`; neither ever calls the predictor on bad input.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{Result, RiskError};
use crate::models::FeatureVector;
use crate::schema::{FEATURE_COUNT, Feature};

/// Numbers parsed from free text, before the length check
pub type RawValues = SmallVec<[f64; FEATURE_COUNT]>;

/// Parse a comma separated line such as `6,148,72,35,0,33.6,0.627,50`.
///
/// # Errors
/// `MalformedNumericInput` for the first token that is not a finite number
/// (positions are 1-based), `InvalidInputLength` when the line does not hold
/// exactly eight numbers.
pub fn parse_comma_separated(text: &str) -> Result<FeatureVector> {
    let values = parse_values(text)?;
    FeatureVector::from_slice(&values)
}

/// Parse every comma separated token as a number without checking the count
pub fn parse_values(text: &str) -> Result<RawValues> {
    text.split(',')
        .enumerate()
        .map(|(i, token)| {
            let token = token.trim();
            token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| RiskError::MalformedNumericInput {
                    position: i + 1,
                    token: token.to_string(),
                })
        })
        .collect()
}

/// Field-by-field entry of the eight measurements
///
/// Serializes with the schema column names, which is also the layout of a
/// history row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MedicalForm {
    #[serde(rename = "Pregnancies")]
    pub pregnancies: f64,
    #[serde(rename = "Glucose")]
    pub glucose: f64,
    #[serde(rename = "BloodPressure")]
    pub blood_pressure: f64,
    #[serde(rename = "SkinThickness")]
    pub skin_thickness: f64,
    #[serde(rename = "Insulin")]
    pub insulin: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    #[serde(rename = "DiabetesPedigreeFunction")]
    pub diabetes_pedigree_function: f64,
    #[serde(rename = "Age")]
    pub age: f64,
}

impl MedicalForm {
    /// Values in schema order, unchecked
    #[must_use]
    pub const fn to_vector(&self) -> FeatureVector {
        FeatureVector::new([
            self.pregnancies,
            self.glucose,
            self.blood_pressure,
            self.skin_thickness,
            self.insulin,
            self.bmi,
            self.diabetes_pedigree_function,
            self.age,
        ])
    }

    /// Check every field against its form bounds and return the vector.
    ///
    /// Zero is inside every range, so leaving a field at zero is how the
    /// user says "not measured".
    pub fn validate(&self) -> Result<FeatureVector> {
        let vector = self.to_vector();
        vector.ensure_finite()?;

        for (feature, value) in vector.iter() {
            let bounds = feature.bounds();
            if !bounds.contains(value) {
                return Err(RiskError::ValueOutOfRange {
                    feature,
                    value,
                    min: bounds.min,
                    max: bounds.max,
                });
            }
        }
        Ok(vector)
    }
}

impl From<&FeatureVector> for MedicalForm {
    fn from(v: &FeatureVector) -> Self {
        Self {
            pregnancies: v[Feature::Pregnancies],
            glucose: v[Feature::Glucose],
            blood_pressure: v[Feature::BloodPressure],
            skin_thickness: v[Feature::SkinThickness],
            insulin: v[Feature::Insulin],
            bmi: v[Feature::Bmi],
            diabetes_pedigree_function: v[Feature::DiabetesPedigreeFunction],
            age: v[Feature::Age],
        }
    }
}
