//! Feature standardization

use serde::Deserialize;

use crate::error::{Result, RiskError};
use crate::models::FeatureVector;
use crate::schema::{FEATURE_COUNT, FeatureSchema};

const COMPONENT: &str = "scaler";

/// A fitted, read-only transform applied to an imputed vector before
/// classification
pub trait FeatureScaler {
    /// Map a raw (imputed) vector to the space the classifier was fitted in
    fn transform(&self, features: &FeatureVector) -> FeatureVector;
}

/// Per-feature standardization: `z = (x - mean) / scale`
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

/// On-disk form of a fitted standard scaler.
///
/// `mean` is absent when the scaler was fitted without centering and
/// `scale` is absent when it was fitted without scaling.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScalerParams {
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
    /// Column names seen at fit time, if recorded
    #[serde(default)]
    pub feature_names_in: Option<Vec<String>>,
}

impl StandardScaler {
    /// Create a scaler from centers and scales.
    ///
    /// Every parameter must be finite and every scale non-zero.
    pub fn new(mean: [f64; FEATURE_COUNT], scale: [f64; FEATURE_COUNT]) -> Result<Self> {
        if let Some(i) = mean.iter().position(|m| !m.is_finite()) {
            return Err(RiskError::invalid(COMPONENT, format!("mean[{i}] is not finite")));
        }
        if let Some(i) = scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(RiskError::invalid(
                COMPONENT,
                format!("scale[{i}] must be finite and non-zero, got {}", scale[i]),
            ));
        }
        Ok(Self { mean, scale })
    }

    /// Validate and convert the on-disk parameters
    pub fn from_params(params: StandardScalerParams) -> Result<Self> {
        if let Some(names) = &params.feature_names_in {
            FeatureSchema::from_names(names).map_err(|e| {
                RiskError::invalid(COMPONENT, format!("fitted on a different schema: {e}"))
            })?;
        }

        let mean = fixed_length("mean", params.mean, 0.0)?;
        let scale = fixed_length("scale", params.scale, 1.0)?;
        Self::new(mean, scale)
    }

    #[must_use]
    pub const fn mean(&self) -> &[f64; FEATURE_COUNT] {
        &self.mean
    }

    #[must_use]
    pub const fn scale(&self) -> &[f64; FEATURE_COUNT] {
        &self.scale
    }
}

fn fixed_length(
    name: &str,
    values: Option<Vec<f64>>,
    default: f64,
) -> Result<[f64; FEATURE_COUNT]> {
    match values {
        None => Ok([default; FEATURE_COUNT]),
        Some(values) => {
            let len = values.len();
            values.try_into().map_err(|_| {
                RiskError::invalid(
                    COMPONENT,
                    format!("{name} has {len} entries, expected {FEATURE_COUNT}"),
                )
            })
        }
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, x) in features.values().iter().enumerate() {
            out[i] = (x - self.mean[i]) / self.scale[i];
        }
        FeatureVector::new(out)
    }
}
