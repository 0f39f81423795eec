//! Feature schema for the risk model.
//!
//! The model was fitted on eight columns in a fixed order. Every vector,
//! artifact and history file in this crate is positionally aligned to that
//! order, so the order itself is part of the contract.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};

/// Number of features the model expects
pub const FEATURE_COUNT: usize = 8;

/// One input measurement of the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Feature {
    /// Number of times pregnant
    Pregnancies = 0,
    /// Plasma glucose concentration, 2 hours into an oral glucose tolerance test
    Glucose = 1,
    /// Diastolic blood pressure
    BloodPressure = 2,
    /// Triceps skin fold thickness
    SkinThickness = 3,
    /// 2-hour serum insulin
    Insulin = 4,
    /// Body mass index
    #[serde(rename = "BMI")]
    Bmi = 5,
    /// Family history score
    DiabetesPedigreeFunction = 6,
    /// Age in years
    Age = 7,
}

impl Feature {
    /// All features in schema order
    pub const ALL: [Self; FEATURE_COUNT] = [
        Self::Pregnancies,
        Self::Glucose,
        Self::BloodPressure,
        Self::SkinThickness,
        Self::Insulin,
        Self::Bmi,
        Self::DiabetesPedigreeFunction,
        Self::Age,
    ];

    /// Features where a recorded zero is biologically implausible and is
    /// read as "not recorded"
    pub const IMPUTABLE: [Self; 5] = [
        Self::Glucose,
        Self::BloodPressure,
        Self::SkinThickness,
        Self::Insulin,
        Self::Bmi,
    ];

    /// Column name used by the fitted artifacts and the history file
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pregnancies => "Pregnancies",
            Self::Glucose => "Glucose",
            Self::BloodPressure => "BloodPressure",
            Self::SkinThickness => "SkinThickness",
            Self::Insulin => "Insulin",
            Self::Bmi => "BMI",
            Self::DiabetesPedigreeFunction => "DiabetesPedigreeFunction",
            Self::Age => "Age",
        }
    }

    /// Position of this feature in a feature vector
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether a zero in this position is treated as missing
    #[must_use]
    pub const fn is_imputable(self) -> bool {
        matches!(
            self,
            Self::Glucose | Self::BloodPressure | Self::SkinThickness | Self::Insulin | Self::Bmi
        )
    }

    /// Range accepted by the field-by-field entry form
    #[must_use]
    pub const fn bounds(self) -> FieldBounds {
        match self {
            Self::Pregnancies => FieldBounds::integer(0.0, 20.0),
            Self::Glucose => FieldBounds::integer(0.0, 300.0),
            Self::BloodPressure => FieldBounds::integer(0.0, 150.0),
            Self::SkinThickness => FieldBounds::integer(0.0, 100.0),
            Self::Insulin => FieldBounds::integer(0.0, 1000.0),
            Self::Bmi => FieldBounds::decimal(0.0, 70.0),
            Self::DiabetesPedigreeFunction => FieldBounds::decimal(0.0, 3.0),
            Self::Age => FieldBounds::integer(0.0, 120.0),
        }
    }

    /// Unit of measurement, if the feature has one
    #[must_use]
    pub const fn unit(self) -> Option<&'static str> {
        match self {
            Self::Glucose => Some("mg/dL"),
            Self::BloodPressure => Some("mm Hg"),
            Self::SkinThickness => Some("mm"),
            Self::Insulin => Some("mu U/ml"),
            Self::Bmi => Some("kg/m^2"),
            Self::Age => Some("years"),
            Self::Pregnancies | Self::DiabetesPedigreeFunction => None,
        }
    }

    /// Human readable explanation of the measurement
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Pregnancies => "Number of times pregnant",
            Self::Glucose => "Plasma glucose concentration in a 2-hour oral glucose tolerance test",
            Self::BloodPressure => "Diastolic blood pressure",
            Self::SkinThickness => "Triceps skin fold thickness",
            Self::Insulin => "2-hour serum insulin",
            Self::Bmi => "Body mass index",
            Self::DiabetesPedigreeFunction => "Likelihood of diabetes based on family history",
            Self::Age => "Age in years",
        }
    }

    /// Look up a feature by its column name (exact match)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
            .ok_or_else(|| RiskError::SchemaError(format!("Unknown feature name: {s}")))
    }
}

/// Inclusive value range for a form field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    /// Smallest accepted value
    pub min: f64,
    /// Largest accepted value
    pub max: f64,
    /// Whether the form collects whole numbers only
    pub integer: bool,
}

impl FieldBounds {
    const fn integer(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            integer: true,
        }
    }

    const fn decimal(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            integer: false,
        }
    }

    /// Whether `value` lies within the bounds
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// The ordered list of feature names a model was fitted on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    features: [Feature; FEATURE_COUNT],
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::canonical()
    }
}

impl FeatureSchema {
    /// The schema the risk model is defined over
    #[must_use]
    pub const fn canonical() -> Self {
        Self {
            features: Feature::ALL,
        }
    }

    /// Build a schema from a list of column names, rejecting anything that
    /// is not the canonical order
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.len() != FEATURE_COUNT {
            return Err(RiskError::SchemaError(format!(
                "expected {FEATURE_COUNT} feature names, found {}",
                names.len()
            )));
        }

        for (position, (name, expected)) in names.iter().zip(Feature::ALL).enumerate() {
            let name = name.as_ref();
            if name != expected.name() {
                return Err(RiskError::SchemaError(match Feature::from_name(name) {
                    Some(found) => format!(
                        "feature {found} at position {position}, expected {expected} (column order must match the fitted model)"
                    ),
                    None => format!("unknown feature {name:?} at position {position}"),
                }));
            }
        }

        Ok(Self::canonical())
    }

    /// Features in order
    #[must_use]
    pub const fn features(&self) -> &[Feature; FEATURE_COUNT] {
        &self.features
    }

    /// Column names in order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.features.iter().map(|f| f.name())
    }

    /// Comma separated header line
    #[must_use]
    pub fn header(&self) -> String {
        self.names().join(",")
    }

    /// Arrow schema with one non-nullable `Float64` column per feature
    #[must_use]
    pub fn arrow_schema(&self) -> Arc<Schema> {
        let fields = self
            .features
            .iter()
            .map(|f| Field::new(f.name(), DataType::Float64, false))
            .collect_vec();
        Arc::new(Schema::new(fields))
    }

    /// Check that a list of column names (e.g. a CSV header) matches this schema
    pub fn check_header<S: AsRef<str>>(&self, header: &[S]) -> Result<()> {
        let found = header.iter().map(|s| s.as_ref().trim()).collect_vec();
        if found.iter().copied().eq(self.names()) {
            Ok(())
        } else {
            Err(RiskError::SchemaError(format!(
                "header [{}] does not match schema [{}]",
                found.join(","),
                self.header()
            )))
        }
    }
}
