//! Algorithm implementations for risk prediction
//!
//! This module contains the preprocessing steps, the fitted classifier and
//! the prediction pipeline that combines them.

pub mod classifier;
pub mod imputation;
pub mod predictor;
pub mod scaler;

// Re-export common types
pub use classifier::{Classifier, Kernel, SvmClassifier, SvmParams};
pub use imputation::{ImputationTable, ImputedFeatures};
pub use predictor::{PredictionTrace, RiskPredictor};
pub use scaler::{FeatureScaler, StandardScaler, StandardScalerParams};
