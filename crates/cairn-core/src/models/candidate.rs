//! Per-path retrieval output. Scores are only comparable within one path.

use serde::{Deserialize, Serialize};

/// Path-specific evidence for why a candidate was returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathDetail {
    Keyword { matched_terms: Vec<String> },
    Metadata { matched_fields: Vec<String> },
    Vector { collection: String, similarity: f64 },
    Graph { depth: usize, relationship: String },
    Agentic { steps: Vec<String> },
}

/// One candidate from one retrieval path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub document_id: String,
    pub object_type: String,
    pub name: String,
    /// Path-local score. Not comparable across paths until fused.
    pub score: f64,
    pub detail: PathDetail,
    /// Human-readable text used for reranking and display.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl CandidateResult {
    /// Raw cosine similarity when this candidate came from the vector index.
    pub fn semantic_score(&self) -> Option<f64> {
        match &self.detail {
            PathDetail::Vector { similarity, .. } => Some(*similarity),
            _ => None,
        }
    }
}
