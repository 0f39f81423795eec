//! Diabetes risk prediction from eight clinical measurements.
//!
//! Raw measurements are zero-imputed, standardized with a fitted scaler and
//! classified by a fitted support vector machine. The fitted artifacts are
//! loaded once into an immutable [`RiskPredictor`] that every caller shares.

pub mod algorithm;
pub mod assistant;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod loader;
pub mod models;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
pub use algorithm::{
    Classifier, FeatureScaler, ImputationTable, PredictionTrace, RiskPredictor, StandardScaler,
    SvmClassifier,
};
pub use assistant::{Assistant, AssistantReply, ReasoningAgent, SearchTool, Session};
pub use config::PredictorConfig;
pub use error::{Result, RiskError};
pub use history::HistoryStore;
pub use input::{MedicalForm, parse_comma_separated};
pub use loader::{ArtifactSet, load_artifacts};
pub use models::{FeatureVector, Verdict};
pub use schema::{FEATURE_COUNT, Feature, FeatureSchema};
