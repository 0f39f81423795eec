//! Fitted artifact loading
//!
//! The predictor depends on four files produced by the offline fitting
//! process. They are read once at startup, validated against the feature
//! schema, and never touched again. Any problem with any of them is an
//! `ArtifactLoadFailure`; there is no partially loaded state.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use log::{debug, info};
use serde::de::DeserializeOwned;

use crate::algorithm::{
    ImputationTable, StandardScaler, StandardScalerParams, SvmClassifier, SvmParams,
};
use crate::config::PredictorConfig;
use crate::error::util::safe_read_to_string;
use crate::error::{Result, RiskError};
use crate::schema::FeatureSchema;
use crate::utils::logging::{log_operation_complete, log_operation_start};

pub const FEATURE_NAMES: &str = "feature names";
pub const IMPUTE_MEANS: &str = "imputation means";
pub const SCALER: &str = "scaler";
pub const MODEL: &str = "model";

/// Everything the predictor needs, fully validated
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub schema: FeatureSchema,
    pub imputation: ImputationTable,
    pub scaler: StandardScaler,
    pub classifier: SvmClassifier,
}

/// Load and validate all four artifacts named by `config`
pub fn load_artifacts(config: &PredictorConfig) -> Result<ArtifactSet> {
    let start = Instant::now();
    log_operation_start("Loading model artifacts from", &config.artifact_dir);

    let schema = load_feature_names(&config.feature_names_path())?;
    let imputation = load_imputation_means(&config.impute_means_path())?;
    let scaler = load_scaler(&config.scaler_path())?;
    let classifier = load_classifier(&config.model_path())?;

    match classifier.n_support() {
        Some(n) => info!("Loaded kernel SVM with {n} support vectors"),
        None => info!("Loaded linear SVM"),
    }
    log_operation_complete("loaded", &config.artifact_dir, 4, Some(start.elapsed()));

    Ok(ArtifactSet {
        schema,
        imputation,
        scaler,
        classifier,
    })
}

/// Read the ordered feature-name list and check it against the schema
pub fn load_feature_names(path: &Path) -> Result<FeatureSchema> {
    let names: Vec<String> = read_json(FEATURE_NAMES, path)?;
    FeatureSchema::from_names(&names).map_err(|e| RiskError::artifact(FEATURE_NAMES, path, e))
}

/// Read the name-keyed imputation means
pub fn load_imputation_means(path: &Path) -> Result<ImputationTable> {
    let means: BTreeMap<String, f64> = read_json(IMPUTE_MEANS, path)?;
    ImputationTable::from_named(&means).map_err(|e| RiskError::artifact(IMPUTE_MEANS, path, e))
}

/// Read the fitted scaler parameters
pub fn load_scaler(path: &Path) -> Result<StandardScaler> {
    let params: StandardScalerParams = read_json(SCALER, path)?;
    StandardScaler::from_params(params).map_err(|e| RiskError::artifact(SCALER, path, e))
}

/// Read the fitted classifier parameters
pub fn load_classifier(path: &Path) -> Result<SvmClassifier> {
    let params: SvmParams = read_json(MODEL, path)?;
    SvmClassifier::from_params(params).map_err(|e| RiskError::artifact(MODEL, path, e))
}

fn read_json<T: DeserializeOwned>(artifact: &'static str, path: &Path) -> Result<T> {
    debug!("Reading {artifact} from {}", path.display());
    let content =
        safe_read_to_string(path, artifact).map_err(|e| RiskError::artifact(artifact, path, e))?;
    serde_json::from_str(&content).map_err(|e| RiskError::artifact(artifact, path, e.into()))
}
