//! Fitted binary classifiers
//!
//! The risk model is a support vector machine. Both the primal form (a
//! single weight vector, as produced by a linear SVM) and the dual form
//! (support vectors with a kernel) are supported. In either case the
//! decision value decides the class: strictly positive means the positive
//! class.

use serde::Deserialize;

use crate::error::{Result, RiskError};
use crate::models::FeatureVector;
use crate::schema::FEATURE_COUNT;

const COMPONENT: &str = "classifier";

/// A fitted, read-only binary decision function over standardized vectors
pub trait Classifier {
    /// Class label for a standardized vector
    fn predict_label(&self, features: &FeatureVector) -> i64;
}

/// Kernel function of a dual-form SVM
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    /// `u·v`
    Linear,
    /// `exp(-gamma * |u - v|^2)`
    Rbf { gamma: f64 },
    /// `(gamma * u·v + coef0)^degree`
    Poly {
        gamma: f64,
        #[serde(default)]
        coef0: f64,
        degree: u32,
    },
    /// `tanh(gamma * u·v + coef0)`
    Sigmoid {
        gamma: f64,
        #[serde(default)]
        coef0: f64,
    },
}

impl Kernel {
    #[must_use]
    pub fn evaluate(&self, u: &[f64; FEATURE_COUNT], v: &[f64; FEATURE_COUNT]) -> f64 {
        match *self {
            Self::Linear => dot(u, v),
            Self::Rbf { gamma } => {
                let dist: f64 = u.iter().zip(v).map(|(a, b)| (a - b) * (a - b)).sum();
                (-gamma * dist).exp()
            }
            Self::Poly {
                gamma,
                coef0,
                degree,
            } => {
                let base = gamma.mul_add(dot(u, v), coef0);
                base.powi(i32::try_from(degree).unwrap_or(i32::MAX))
            }
            Self::Sigmoid { gamma, coef0 } => gamma.mul_add(dot(u, v), coef0).tanh(),
        }
    }

    fn validate(&self) -> Result<()> {
        let gamma = match *self {
            Self::Linear => return Ok(()),
            Self::Rbf { gamma } => gamma,
            Self::Poly { gamma, coef0, .. } | Self::Sigmoid { gamma, coef0 } => {
                if !coef0.is_finite() {
                    return Err(RiskError::invalid(COMPONENT, "kernel coef0 is not finite"));
                }
                gamma
            }
        };
        if gamma.is_finite() && gamma > 0.0 {
            Ok(())
        } else {
            Err(RiskError::invalid(
                COMPONENT,
                format!("kernel gamma must be positive and finite, got {gamma}"),
            ))
        }
    }
}

fn dot(u: &[f64; FEATURE_COUNT], v: &[f64; FEATURE_COUNT]) -> f64 {
    u.iter().zip(v).map(|(a, b)| a * b).sum()
}

/// On-disk form of a fitted SVM
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SvmParams {
    /// Primal form: one weight per feature
    LinearSvc {
        coef: Vec<f64>,
        intercept: f64,
        #[serde(default)]
        classes: Option<[i64; 2]>,
    },
    /// Dual form: support vectors, their dual coefficients and a kernel
    KernelSvc {
        kernel: Kernel,
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<f64>,
        intercept: f64,
        #[serde(default)]
        classes: Option<[i64; 2]>,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum SvmModel {
    Linear {
        coef: [f64; FEATURE_COUNT],
        intercept: f64,
    },
    Kernel {
        kernel: Kernel,
        support_vectors: Vec<[f64; FEATURE_COUNT]>,
        dual_coef: Vec<f64>,
        intercept: f64,
    },
}

/// A validated support vector classifier
#[derive(Debug, Clone, PartialEq)]
pub struct SvmClassifier {
    model: SvmModel,
    /// `[negative, positive]` class labels
    classes: [i64; 2],
}

impl SvmClassifier {
    /// Linear SVM with labels `0` / `1`
    pub fn linear(coef: [f64; FEATURE_COUNT], intercept: f64) -> Result<Self> {
        Self::from_params(SvmParams::LinearSvc {
            coef: coef.to_vec(),
            intercept,
            classes: None,
        })
    }

    /// Validate and convert the on-disk parameters
    pub fn from_params(params: SvmParams) -> Result<Self> {
        let (model, classes) = match params {
            SvmParams::LinearSvc {
                coef,
                intercept,
                classes,
            } => {
                let coef = to_fixed("coef", coef)?;
                ensure_finite("coef", &coef)?;
                ensure_finite("intercept", &[intercept])?;
                (SvmModel::Linear { coef, intercept }, classes)
            }
            SvmParams::KernelSvc {
                kernel,
                support_vectors,
                dual_coef,
                intercept,
                classes,
            } => {
                kernel.validate()?;
                if support_vectors.is_empty() {
                    return Err(RiskError::invalid(COMPONENT, "model has no support vectors"));
                }
                if support_vectors.len() != dual_coef.len() {
                    return Err(RiskError::invalid(
                        COMPONENT,
                        format!(
                            "{} support vectors but {} dual coefficients",
                            support_vectors.len(),
                            dual_coef.len()
                        ),
                    ));
                }
                let support_vectors = support_vectors
                    .into_iter()
                    .enumerate()
                    .map(|(i, sv)| -> Result<[f64; FEATURE_COUNT]> {
                        let sv = to_fixed(&format!("support_vectors[{i}]"), sv)?;
                        ensure_finite(&format!("support_vectors[{i}]"), &sv)?;
                        Ok(sv)
                    })
                    .collect::<Result<Vec<_>>>()?;
                ensure_finite("dual_coef", &dual_coef)?;
                ensure_finite("intercept", &[intercept])?;
                (
                    SvmModel::Kernel {
                        kernel,
                        support_vectors,
                        dual_coef,
                        intercept,
                    },
                    classes,
                )
            }
        };

        let classes = classes.unwrap_or([0, 1]);
        if classes[0] == classes[1] {
            return Err(RiskError::invalid(
                COMPONENT,
                format!("class labels must differ, got {classes:?}"),
            ));
        }

        Ok(Self { model, classes })
    }

    /// Signed distance-like score; positive means the positive class
    #[must_use]
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        let x = features.values();
        match &self.model {
            SvmModel::Linear { coef, intercept } => dot(coef, x) + intercept,
            SvmModel::Kernel {
                kernel,
                support_vectors,
                dual_coef,
                intercept,
            } => {
                support_vectors
                    .iter()
                    .zip(dual_coef)
                    .map(|(sv, alpha)| alpha * kernel.evaluate(sv, x))
                    .sum::<f64>()
                    + intercept
            }
        }
    }

    #[must_use]
    pub const fn classes(&self) -> [i64; 2] {
        self.classes
    }

    /// Number of support vectors, or `None` for a primal-form model
    #[must_use]
    pub fn n_support(&self) -> Option<usize> {
        match &self.model {
            SvmModel::Linear { .. } => None,
            SvmModel::Kernel {
                support_vectors, ..
            } => Some(support_vectors.len()),
        }
    }
}

impl Classifier for SvmClassifier {
    fn predict_label(&self, features: &FeatureVector) -> i64 {
        if self.decision_function(features) > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        }
    }
}

fn to_fixed(name: &str, values: Vec<f64>) -> Result<[f64; FEATURE_COUNT]> {
    let len = values.len();
    values.try_into().map_err(|_| {
        RiskError::invalid(
            COMPONENT,
            format!("{name} has {len} entries, expected {FEATURE_COUNT}"),
        )
    })
}

fn ensure_finite(name: &str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(RiskError::invalid(COMPONENT, format!("{name}[{i}] is not finite"))),
        None => Ok(()),
    }
}
