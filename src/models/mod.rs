//! Domain models for risk prediction
//!
//! This module contains the value types that flow through the prediction
//! pipeline: the positional feature vector and the final verdict.

pub mod feature_vector;
pub mod verdict;

// Re-export commonly used types
pub use feature_vector::FeatureVector;
pub use verdict::Verdict;
