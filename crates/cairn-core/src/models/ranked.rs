use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::routing::RoutingPath;

/// A fused (or reranked) result with a single comparable score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub document_id: String,
    pub fused_score: f64,
    /// Score contribution per routing path.
    pub contributions: BTreeMap<RoutingPath, f64>,
    /// 1-based rank; unique within one result list.
    pub rank: usize,
    /// Best raw semantic similarity seen for this document, if any.
    #[serde(default)]
    pub semantic_score: Option<f64>,
}
