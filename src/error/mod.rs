//! Error handling for the risk predictor.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

use crate::schema::Feature;

/// Specialized error type for risk prediction and its surrounding plumbing
#[derive(Debug, thiserror::Error)]
pub enum RiskError {
    /// Input did not contain exactly one value per schema feature
    #[error("Invalid input length: expected exactly {expected} values, got {actual}")]
    InvalidInputLength { expected: usize, actual: usize },

    /// A value in free-text input could not be read as a number
    #[error("Malformed numeric input at position {position}: {token:?} is not a number")]
    MalformedNumericInput { position: usize, token: String },

    /// A value is NaN or infinite
    #[error("Non-finite value for {feature}: {value}")]
    NonFiniteInput { feature: Feature, value: f64 },

    /// A form value is outside the range the entry form accepts
    #[error("{feature} = {value} is out of range, expected {min} to {max}")]
    ValueOutOfRange {
        feature: Feature,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A fitted parameter set is inconsistent (wrong dimension, non-finite
    /// value, zero scale, missing entries)
    #[error("Invalid {component} parameters: {reason}")]
    InvalidParameters {
        component: &'static str,
        reason: String,
    },

    /// One of the startup artifacts is missing or corrupt
    #[error("Failed to load {artifact} artifact from {}: {source}", .path.display())]
    ArtifactLoadFailure {
        artifact: &'static str,
        path: PathBuf,
        #[source]
        source: Box<RiskError>,
    },

    /// Error with schema compatibility
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// Error opening, reading or writing a file
    #[error("IO error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Error from Arrow while building or reading record batches
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error writing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error decoding a JSON document
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Error converting between records and Arrow batches
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An external collaborator (agent, search tool) failed
    #[error("Collaborator error: {0:#}")]
    Collaborator(anyhow::Error),
}

impl RiskError {
    /// Create an IO error with a description of what was being attempted
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wrap an error raised while loading one of the startup artifacts
    pub fn artifact(artifact: &'static str, path: impl Into<PathBuf>, source: Self) -> Self {
        Self::ArtifactLoadFailure {
            artifact,
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Create an invalid-parameters error for a fitted component
    pub fn invalid(component: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameters {
            component,
            reason: reason.into(),
        }
    }

    /// Whether this error was caused by what the user typed rather than by
    /// the environment
    #[must_use]
    pub const fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInputLength { .. }
                | Self::MalformedNumericInput { .. }
                | Self::NonFiniteInput { .. }
                | Self::ValueOutOfRange { .. }
        )
    }
}

impl From<serde_arrow::Error> for RiskError {
    fn from(error: serde_arrow::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type for risk predictor operations
pub type Result<T> = std::result::Result<T, RiskError>;
