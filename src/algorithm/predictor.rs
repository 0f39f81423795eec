//! Risk prediction pipeline
//!
//! `RiskPredictor` owns the fitted artifacts and runs the three steps of a
//! prediction: zero-imputation, standardization and classification. It holds
//! no mutable state, so a single instance can be loaded at startup and shared
//! by every caller for the life of the process.

use log::debug;
use rayon::prelude::*;

use crate::algorithm::classifier::{Classifier, SvmClassifier};
use crate::algorithm::imputation::{ImputationTable, ImputedFeatures};
use crate::algorithm::scaler::{FeatureScaler, StandardScaler};
use crate::config::PredictorConfig;
use crate::error::Result;
use crate::loader::{self, ArtifactSet};
use crate::models::{FeatureVector, Verdict};
use crate::schema::FeatureSchema;

/// Every intermediate value of one prediction
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionTrace {
    /// Input as given
    pub raw: FeatureVector,
    /// Input after zero-imputation
    pub imputed: FeatureVector,
    /// Features whose zero was replaced, in schema order
    pub imputed_features: ImputedFeatures,
    /// Imputed input after scaling
    pub standardized: FeatureVector,
    /// Classifier output
    pub label: i64,
    pub verdict: Verdict,
}

/// Immutable prediction context built from fitted artifacts
#[derive(Debug, Clone)]
pub struct RiskPredictor<S = StandardScaler, C = SvmClassifier> {
    schema: FeatureSchema,
    imputation: ImputationTable,
    scaler: S,
    classifier: C,
}

impl RiskPredictor {
    /// Load all artifacts named by `config` and build a predictor.
    ///
    /// Fails if any artifact is missing or invalid; no predictor exists in a
    /// partially loaded state.
    pub fn load(config: &PredictorConfig) -> Result<Self> {
        Ok(Self::from_artifacts(loader::load_artifacts(config)?))
    }

    #[must_use]
    pub fn from_artifacts(set: ArtifactSet) -> Self {
        Self::new(set.schema, set.imputation, set.scaler, set.classifier)
    }
}

impl<S: FeatureScaler, C: Classifier> RiskPredictor<S, C> {
    /// Assemble a predictor from already validated parts
    pub fn new(
        schema: FeatureSchema,
        imputation: ImputationTable,
        scaler: S,
        classifier: C,
    ) -> Self {
        Self {
            schema,
            imputation,
            scaler,
            classifier,
        }
    }

    /// Classify one set of raw measurements.
    ///
    /// # Errors
    /// `InvalidInputLength` if `raw` is not exactly one value per feature,
    /// checked before any other work. `NonFiniteInput` if a value is NaN or
    /// infinite.
    pub fn predict(&self, raw: &[f64]) -> Result<Verdict> {
        self.explain(raw).map(|trace| trace.verdict)
    }

    /// Run a prediction and return every intermediate value
    pub fn explain(&self, raw: &[f64]) -> Result<PredictionTrace> {
        let raw = FeatureVector::from_slice(raw)?;
        raw.ensure_finite()?;

        let (imputed, imputed_features) = self.imputation.apply(&raw);
        let standardized = self.scaler.transform(&imputed);
        let label = self.classifier.predict_label(&standardized);
        let verdict = Verdict::from_label(label);

        debug!("Predicted {verdict} (label {label}) for {raw}");

        Ok(PredictionTrace {
            raw,
            imputed,
            imputed_features,
            standardized,
            label,
            verdict,
        })
    }

    /// Classify many rows in parallel. Results keep the input order and each
    /// row succeeds or fails on its own.
    pub fn predict_batch<R>(&self, rows: &[R]) -> Vec<Result<Verdict>>
    where
        R: AsRef<[f64]> + Sync,
        S: Sync,
        C: Sync,
    {
        rows.par_iter().map(|row| self.predict(row.as_ref())).collect()
    }

    #[must_use]
    pub const fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    #[must_use]
    pub const fn imputation(&self) -> &ImputationTable {
        &self.imputation
    }

    #[must_use]
    pub const fn scaler(&self) -> &S {
        &self.scaler
    }

    #[must_use]
    pub const fn classifier(&self) -> &C {
        &self.classifier
    }
}
