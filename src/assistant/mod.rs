//! Question answering around the risk predictor
//!
//! The reasoning agent and the search tools are external services; this
//! module only defines the seams they plug into and the order in which a
//! user query is routed through them.

use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::algorithm::{Classifier, FeatureScaler, RiskPredictor};
use crate::error::{Result, RiskError};
use crate::history::HistoryStore;
use crate::models::{FeatureVector, Verdict};

/// A general-purpose reasoning agent that answers free-text queries
pub trait ReasoningAgent {
    fn respond(&self, query: &str) -> anyhow::Result<String>;
}

/// A search service (internet, video) that answers free-text queries with a
/// free-text listing
pub trait SearchTool {
    fn search(&self, query: &str) -> anyhow::Result<String>;
}

impl<T: ReasoningAgent + ?Sized> ReasoningAgent for &T {
    fn respond(&self, query: &str) -> anyhow::Result<String> {
        (**self).respond(query)
    }
}

impl<T: SearchTool + ?Sized> SearchTool for &T {
    fn search(&self, query: &str) -> anyhow::Result<String> {
        (**self).search(query)
    }
}

/// Measurements the user has set for the current session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedicalData {
    pub values: FeatureVector,
    pub set_at: DateTime<Utc>,
}

/// One user's interaction state
#[derive(Debug, Clone)]
pub struct Session {
    history: HistoryStore,
    medical_data: Option<MedicalData>,
}

impl Session {
    pub const fn new(history: HistoryStore) -> Self {
        Self {
            history,
            medical_data: None,
        }
    }

    /// Set the session's measurements from raw values.
    ///
    /// The values are checked for length, logged to the history store, and
    /// only then become the session's data. Nothing is stored when any step
    /// fails.
    pub fn set_data(&mut self, raw: &[f64]) -> Result<FeatureVector> {
        let values = FeatureVector::from_slice(raw)?;
        values.ensure_finite()?;
        self.history.append(&values)?;

        info!("Session data set and stored in {}", self.history.path().display());
        self.medical_data = Some(MedicalData {
            values,
            set_at: Utc::now(),
        });
        Ok(values)
    }

    #[must_use]
    pub const fn medical_data(&self) -> Option<&MedicalData> {
        self.medical_data.as_ref()
    }

    #[must_use]
    pub const fn history(&self) -> &HistoryStore {
        &self.history
    }
}

/// Everything produced for one user query
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    /// The reasoning agent's answer
    pub reasoning: String,
    /// Verdict for the session's data, if any is set
    pub prediction: Option<Verdict>,
    /// Video recommendations for the session's data, if any is set
    pub videos: Option<String>,
}

/// Routes queries through the agent, the predictor and the video search
pub struct Assistant<'a, A, V, S, C> {
    agent: A,
    videos: V,
    predictor: &'a RiskPredictor<S, C>,
}

impl<'a, A, V, S, C> Assistant<'a, A, V, S, C>
where
    A: ReasoningAgent,
    V: SearchTool,
    S: FeatureScaler,
    C: Classifier,
{
    pub fn new(agent: A, videos: V, predictor: &'a RiskPredictor<S, C>) -> Self {
        Self {
            agent,
            videos,
            predictor,
        }
    }

    /// Answer a query.
    ///
    /// The agent always sees the query, annotated with the session's data
    /// when there is some. Prediction and video search only run when data is
    /// set. The first failing step aborts the reply.
    pub fn ask(&self, session: &Session, query: &str) -> Result<AssistantReply> {
        let data = session.medical_data().map(|d| d.values);

        let agent_query = annotate_query(query, data.as_ref());
        debug!("Agent query: {agent_query}");
        let reasoning = self
            .agent
            .respond(&agent_query)
            .context("reasoning agent failed")
            .map_err(RiskError::Collaborator)?;

        let Some(values) = data else {
            return Ok(AssistantReply {
                reasoning,
                prediction: None,
                videos: None,
            });
        };

        let prediction = self.predictor.predict(values.values())?;

        let search_query = video_query(&values);
        let videos = self
            .videos
            .search(&search_query)
            .context("video search failed")
            .map_err(RiskError::Collaborator)?;

        Ok(AssistantReply {
            reasoning,
            prediction: Some(prediction),
            videos: Some(videos),
        })
    }
}

/// Query text sent to the reasoning agent
#[must_use]
pub fn annotate_query(query: &str, data: Option<&FeatureVector>) -> String {
    match data {
        Some(values) => format!("{query} Use this data: {values}"),
        None => query.to_string(),
    }
}

/// Query text sent to the video search
#[must_use]
pub fn video_query(values: &FeatureVector) -> String {
    format!("Diabetes management video recommendations for data {values}")
}
