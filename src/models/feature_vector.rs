//! Positional feature vector
//!
//! A `FeatureVector` always holds exactly one value per schema feature. The
//! length check happens once, when a vector is built from untrusted input;
//! everything downstream can rely on the fixed size.

use std::fmt;
use std::ops::Index;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};
use crate::schema::{FEATURE_COUNT, Feature};

/// Eight measurements aligned to the feature schema
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Create a vector from values already in schema order
    #[must_use]
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Build a vector from raw input of unknown length
    ///
    /// # Errors
    /// Returns `InvalidInputLength` when `raw` does not contain exactly one
    /// value per feature.
    pub fn from_slice(raw: &[f64]) -> Result<Self> {
        let values: [f64; FEATURE_COUNT] =
            raw.try_into().map_err(|_| RiskError::InvalidInputLength {
                expected: FEATURE_COUNT,
                actual: raw.len(),
            })?;
        Ok(Self(values))
    }

    /// Values in schema order
    #[must_use]
    pub const fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Value of a single feature
    #[must_use]
    pub const fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    /// Replace the value of a single feature
    pub const fn set(&mut self, feature: Feature, value: f64) {
        self.0[feature.index()] = value;
    }

    /// Iterate over `(feature, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// Fail on the first NaN or infinite value
    pub fn ensure_finite(&self) -> Result<()> {
        match self.iter().find(|(_, v)| !v.is_finite()) {
            Some((feature, value)) => Err(RiskError::NonFiniteInput { feature, value }),
            None => Ok(()),
        }
    }

    /// Copy the values into a `Vec`
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

impl TryFrom<&[f64]> for FeatureVector {
    type Error = RiskError;

    fn try_from(raw: &[f64]) -> Result<Self> {
        Self::from_slice(raw)
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

impl Index<Feature> for FeatureVector {
    type Output = f64;

    fn index(&self, feature: Feature) -> &f64 {
        &self.0[feature.index()]
    }
}

/// Formats as a bracketed list, e.g. `[6.0, 148.0, 72.0, ...]`.
///
/// This is the form the reasoning agent and the video search receive the
/// user's data in.
impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().map(|v| format!("{v:?}")).join(", "))
    }
}
