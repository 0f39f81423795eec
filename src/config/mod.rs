//! Configuration for the risk predictor.

use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable overriding the artifact directory
pub const ARTIFACT_DIR_ENV: &str = "DIABETES_RISK_ARTIFACT_DIR";
/// Environment variable overriding the history file location
pub const HISTORY_PATH_ENV: &str = "DIABETES_RISK_HISTORY";

/// Where the fitted artifacts and the history log live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictorConfig {
    /// Directory holding the four artifact files
    pub artifact_dir: PathBuf,
    /// Ordered feature names the model was fitted on
    pub feature_names_file: String,
    /// Means used to replace zero-coded missing values
    pub impute_means_file: String,
    /// Fitted standard scaler
    pub scaler_file: String,
    /// Fitted classifier
    pub model_file: String,
    /// Append-only CSV of submitted measurements
    pub history_path: PathBuf,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("."),
            feature_names_file: "feature_names.json".to_string(),
            impute_means_file: "impute_means.json".to_string(),
            scaler_file: "scaler.json".to_string(),
            model_file: "model.json".to_string(),
            history_path: PathBuf::from("user_data.csv"),
        }
    }
}

impl PredictorConfig {
    /// Default configuration with overrides from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a key lookup (the environment, in practice).
    /// Empty values are ignored.
    #[must_use]
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = lookup(ARTIFACT_DIR_ENV) {
            self.artifact_dir = PathBuf::from(dir);
        }
        if let Some(path) = lookup(HISTORY_PATH_ENV) {
            self.history_path = PathBuf::from(path);
        }
        self
    }

    #[must_use]
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = path.into();
        self
    }

    #[must_use]
    pub fn feature_names_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.feature_names_file)
    }

    #[must_use]
    pub fn impute_means_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.impute_means_file)
    }

    #[must_use]
    pub fn scaler_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.scaler_file)
    }

    #[must_use]
    pub fn model_path(&self) -> PathBuf {
        self.artifact_dir.join(&self.model_file)
    }

    #[must_use]
    pub fn history_path(&self) -> &Path {
        &self.history_path
    }
}

impl fmt::Display for PredictorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Predictor Configuration:")?;
        writeln!(f, "  Artifact Directory: {}", self.artifact_dir.display())?;
        writeln!(f, "  Feature Names: {}", self.feature_names_file)?;
        writeln!(f, "  Imputation Means: {}", self.impute_means_file)?;
        writeln!(f, "  Scaler: {}", self.scaler_file)?;
        writeln!(f, "  Model: {}", self.model_file)?;
        writeln!(f, "  History: {}", self.history_path.display())?;
        Ok(())
    }
}
