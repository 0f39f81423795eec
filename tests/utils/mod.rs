//! Shared fixtures and doubles for the integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::PathBuf;

use diabetes_risk::{PredictorConfig, ReasoningAgent, RiskPredictor, SearchTool};

/// Directory holding one set of pinned fixture artifacts
#[must_use]
pub fn fixture_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Configuration pointing at a fixture artifact set
#[must_use]
pub fn fixture_config(name: &str) -> PredictorConfig {
    PredictorConfig::default().with_artifact_dir(fixture_dir(name))
}

/// Predictor loaded from a fixture artifact set
#[must_use]
pub fn fixture_predictor(name: &str) -> RiskPredictor {
    RiskPredictor::load(&fixture_config(name)).expect("fixture artifacts should load")
}

/// Canned measurements with the labels recorded for the linear and RBF
/// fixture models
pub const RECORDED: &[([f64; 8], u8, u8)] = &[
    ([6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0], 1, 1),
    ([1.0, 85.0, 66.0, 29.0, 0.0, 26.6, 0.351, 31.0], 0, 0),
    ([0.0; 8], 0, 0),
    ([8.0, 183.0, 64.0, 0.0, 0.0, 23.3, 0.672, 32.0], 1, 1),
    ([1.0, 89.0, 66.0, 23.0, 94.0, 28.1, 0.167, 21.0], 0, 0),
    ([0.0, 137.0, 40.0, 35.0, 168.0, 43.1, 2.288, 33.0], 1, 0),
    ([5.0, 116.0, 74.0, 0.0, 0.0, 25.6, 0.201, 30.0], 0, 0),
    ([3.0, 78.0, 50.0, 32.0, 88.0, 31.0, 0.248, 26.0], 0, 0),
];

/// Reasoning agent double that records every query and answers with a
/// fixed reply
#[derive(Default)]
pub struct RecordingAgent {
    pub queries: RefCell<Vec<String>>,
    pub fail: bool,
}

impl ReasoningAgent for RecordingAgent {
    fn respond(&self, query: &str) -> anyhow::Result<String> {
        self.queries.borrow_mut().push(query.to_string());
        if self.fail {
            anyhow::bail!("upstream unavailable");
        }
        Ok("Diabetes is a chronic condition affecting blood sugar.".to_string())
    }
}

/// Search tool double that records every query
#[derive(Default)]
pub struct RecordingSearch {
    pub queries: RefCell<Vec<String>>,
}

impl SearchTool for RecordingSearch {
    fn search(&self, query: &str) -> anyhow::Result<String> {
        self.queries.borrow_mut().push(query.to_string());
        Ok("1. Managing type 2 diabetes\n2. Healthy eating with diabetes".to_string())
    }
}
