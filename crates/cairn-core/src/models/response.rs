//! Search responses and their execution metadata.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::graph::{LineageSummary, PiiFlowPath};
use super::routing::RoutingPath;

/// Orchestrator lifecycle state for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Received,
    Classified,
    Retrieving,
    Reranking,
    Fusing,
    Annotating,
    Completed,
    Failed,
}

impl RequestState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStatus {
    Succeeded,
    Failed,
    TimedOut,
}

/// What happened to one retrieval path during a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathOutcome {
    pub path: RoutingPath,
    pub status: PathStatus,
    #[serde(default)]
    pub reason: Option<String>,
    pub candidate_count: usize,
    pub elapsed_ms: u64,
}

impl PathOutcome {
    pub fn succeeded(path: RoutingPath, candidate_count: usize, elapsed_ms: u64) -> Self {
        Self {
            path,
            status: PathStatus::Succeeded,
            reason: None,
            candidate_count,
            elapsed_ms,
        }
    }

    pub fn failed(path: RoutingPath, reason: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            path,
            status: PathStatus::Failed,
            reason: Some(reason.into()),
            candidate_count: 0,
            elapsed_ms,
        }
    }

    pub fn timed_out(path: RoutingPath, elapsed_ms: u64) -> Self {
        Self {
            path,
            status: PathStatus::TimedOut,
            reason: Some(format!("timed out after {elapsed_ms}ms")),
            candidate_count: 0,
            elapsed_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == PathStatus::Succeeded
    }
}

/// Milliseconds spent in each orchestrator stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    pub classification_ms: u64,
    pub retrieval_ms: u64,
    pub rerank_ms: u64,
    pub fusion_ms: u64,
    pub annotation_ms: u64,
    pub total_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    pub candidate_counts: BTreeMap<RoutingPath, usize>,
    pub timings: StageTimings,
    pub path_outcomes: Vec<PathOutcome>,
    pub cache_hit: bool,
    pub classification_reason: String,
    pub classification_confidence: f64,
    pub reranked: bool,
    /// Some component fell back or a path was lost.
    pub degraded: bool,
    /// Lifecycle states in the order they were entered.
    pub states: Vec<RequestState>,
}

impl Default for ExecutionMetadata {
    fn default() -> Self {
        Self {
            candidate_counts: BTreeMap::new(),
            timings: StageTimings::default(),
            path_outcomes: Vec::new(),
            cache_hit: false,
            classification_reason: String::new(),
            classification_confidence: 0.0,
            reranked: false,
            degraded: false,
            states: vec![RequestState::Received],
        }
    }
}

impl ExecutionMetadata {
    pub fn enter(&mut self, state: RequestState) {
        self.states.push(state);
    }

    pub fn failed_paths(&self) -> impl Iterator<Item = &PathOutcome> {
        self.path_outcomes.iter().filter(|o| !o.is_success())
    }
}

/// A suggested next query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpSuggestion {
    pub text: String,
    pub rationale: String,
    #[serde(default)]
    pub routing_path: Option<RoutingPath>,
}

/// One result row in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub document_id: String,
    pub object_type: String,
    pub name: String,
    pub description: String,
    pub relevance_score: f64,
    pub rank: usize,
    pub contributions: BTreeMap<RoutingPath, f64>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub lineage: Option<LineageSummary>,
    pub contains_pii: bool,
    #[serde(default)]
    pub pii_category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// UUID v4; unique per invocation, including cache hits.
    pub query_id: String,
    pub original_query: String,
    #[serde(default)]
    pub expanded_query: Option<String>,
    pub routing_path: RoutingPath,
    pub results: Vec<SearchResultItem>,
    pub follow_ups: Vec<FollowUpSuggestion>,
    #[serde(default)]
    pub pii_flows: Vec<PiiFlowPath>,
    pub metadata: ExecutionMetadata,
    pub created_at: DateTime<Utc>,
}
