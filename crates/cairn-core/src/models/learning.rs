//! Learning records and derived analytics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classification::ComplexityTier;
use super::routing::RoutingPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    Click,
    Expand,
    Export,
    Feedback,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Expand => "expand",
            Self::Export => "export",
            Self::Feedback => "feedback",
        }
    }
}

/// A user action on a served response, joined to it by `query_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningInteraction {
    pub query_id: String,
    pub user_id: String,
    pub interaction_type: InteractionType,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl LearningInteraction {
    pub fn new(
        query_id: impl Into<String>,
        user_id: impl Into<String>,
        interaction_type: InteractionType,
        document_id: Option<String>,
    ) -> Self {
        Self {
            query_id: query_id.into(),
            user_id: user_id.into(),
            interaction_type,
            document_id,
            payload: serde_json::Value::Null,
            timestamp: Utc::now(),
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// One result as it was shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShownResult {
    pub document_id: String,
    pub rank: usize,
    #[serde(default)]
    pub category: Option<String>,
}

/// What the orchestrator records about every served response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShownResponse {
    pub query_id: String,
    pub user_id: String,
    pub normalized_query: String,
    pub routing_path: RoutingPath,
    pub complexity: ComplexityTier,
    /// Categories the query was filtered to or inferred to be about.
    #[serde(default)]
    pub query_categories: Vec<String>,
    pub results: Vec<ShownResult>,
    pub timestamp: DateTime<Utc>,
}

/// Everything that can be pushed onto the learning queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LearningEvent {
    ResponseShown(ShownResponse),
    Interaction(LearningInteraction),
}

impl LearningEvent {
    pub fn query_id(&self) -> &str {
        match self {
            Self::ResponseShown(r) => &r.query_id,
            Self::Interaction(i) => &i.query_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ResponseShown(r) => r.timestamp,
            Self::Interaction(i) => i.timestamp,
        }
    }
}

/// Aggregate learning metrics over a window. Derived; always recomputable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningAnalytics {
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
    pub total_responses: usize,
    pub total_interactions: usize,
    /// Fraction of responses with at least one click.
    pub click_through_rate: f64,
    /// Mean rank of clicked results; `None` without clicks.
    pub average_click_rank: Option<f64>,
    pub routing_distribution: BTreeMap<RoutingPath, usize>,
    pub complexity_distribution: BTreeMap<ComplexityTier, usize>,
    pub per_path_ctr: BTreeMap<RoutingPath, f64>,
    pub interaction_counts: BTreeMap<InteractionType, usize>,
    /// Highest log sequence included in these numbers.
    pub processed_sequence: u64,
}

/// An advisory re-categorization derived from click behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub document_id: String,
    pub current_category: Option<String>,
    pub suggested_category: String,
    pub confidence: f64,
    pub supporting_clicks: usize,
    pub rationale: String,
}
