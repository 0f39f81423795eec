//! Zero-value imputation
//!
//! The training data records "not measured" as `0` for a handful of
//! measurements where a true zero is biologically implausible (nobody has a
//! BMI or a diastolic pressure of zero). Those zeros are replaced with the
//! training-set mean before scaling.
//!
//! This cannot tell a genuine zero reading from a missing one. That is a
//! known approximation of the fitted model and is kept exactly as-is: the
//! sentinel is the literal value `0.0`, nothing near it.

use std::collections::BTreeMap;

use log::{debug, warn};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{Result, RiskError};
use crate::models::FeatureVector;
use crate::schema::Feature;

const COMPONENT: &str = "imputation";

/// Features that were replaced during imputation, in schema order
pub type ImputedFeatures = SmallVec<[Feature; 5]>;

/// Per-feature replacement means for zero-coded missing values
#[derive(Debug, Clone, PartialEq)]
pub struct ImputationTable {
    means: FxHashMap<Feature, f64>,
}

impl ImputationTable {
    /// Build a table from feature/mean pairs.
    ///
    /// Every imputable feature needs a finite mean. Entries for features
    /// outside the imputable subset are rejected.
    pub fn new(means: impl IntoIterator<Item = (Feature, f64)>) -> Result<Self> {
        let mut table = FxHashMap::default();
        for (feature, mean) in means {
            if !feature.is_imputable() {
                return Err(RiskError::invalid(
                    COMPONENT,
                    format!("{feature} is not an imputable feature"),
                ));
            }
            if !mean.is_finite() {
                return Err(RiskError::invalid(
                    COMPONENT,
                    format!("mean for {feature} is not finite: {mean}"),
                ));
            }
            table.insert(feature, mean);
        }

        let missing: Vec<&str> = Feature::IMPUTABLE
            .iter()
            .filter(|f| !table.contains_key(*f))
            .map(|f| f.name())
            .collect();
        if !missing.is_empty() {
            return Err(RiskError::invalid(
                COMPONENT,
                format!("missing means for {}", missing.join(", ")),
            ));
        }

        Ok(Self { means: table })
    }

    /// Build a table from a name-keyed map as stored on disk.
    ///
    /// Unknown names are an error. Means for known but non-imputable
    /// features are dropped with a warning; they would never be used.
    pub fn from_named(means: &BTreeMap<String, f64>) -> Result<Self> {
        let mut pairs = Vec::with_capacity(Feature::IMPUTABLE.len());
        for (name, &mean) in means {
            let feature = Feature::from_name(name).ok_or_else(|| {
                RiskError::invalid(COMPONENT, format!("unknown feature name {name:?}"))
            })?;
            if feature.is_imputable() {
                pairs.push((feature, mean));
            } else {
                warn!("Ignoring imputation mean for non-imputable feature {feature}");
            }
        }
        Self::new(pairs)
    }

    /// Replacement mean for a feature, if it is imputable
    #[must_use]
    pub fn mean(&self, feature: Feature) -> Option<f64> {
        self.means.get(&feature).copied()
    }

    /// Replace exact zeros in imputable positions with their means.
    ///
    /// Returns the imputed vector and the features that were replaced.
    #[must_use]
    pub fn apply(&self, raw: &FeatureVector) -> (FeatureVector, ImputedFeatures) {
        let mut imputed = *raw;
        let mut replaced = ImputedFeatures::new();

        for feature in Feature::IMPUTABLE {
            if raw[feature] != 0.0 {
                continue;
            }
            if let Some(mean) = self.mean(feature) {
                imputed.set(feature, mean);
                replaced.push(feature);
            }
        }

        if !replaced.is_empty() {
            debug!(
                "Imputed {} zero-coded value(s): {:?}",
                replaced.len(),
                replaced.as_slice()
            );
        }

        (imputed, replaced)
    }
}
