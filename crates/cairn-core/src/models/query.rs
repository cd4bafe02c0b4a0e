//! Search requests.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_QUERY_CHARS, MAX_SEARCH_RESULTS};
use crate::errors::{CairnError, CairnResult};

use super::routing::RoutingPath;

/// Caller-supplied search options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Maximum results in the response (1..=100).
    pub max_results: usize,
    /// Attach lineage summaries to the top results.
    pub include_lineage: bool,
    /// Attach PII flow paths touching the top results.
    pub include_pii_flows: bool,
    /// Run the late-stage reranker over fast-path candidates.
    pub enable_reranking: bool,
    /// Classifications below this confidence are treated as ambiguous.
    pub min_confidence: f64,
    pub filter_databases: Vec<String>,
    pub filter_object_types: Vec<String>,
    pub filter_categories: Vec<String>,
    /// Skip classification and route straight to this path.
    pub force_routing_path: Option<RoutingPath>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 20,
            include_lineage: false,
            include_pii_flows: false,
            enable_reranking: true,
            min_confidence: 0.5,
            filter_databases: Vec::new(),
            filter_object_types: Vec::new(),
            filter_categories: Vec::new(),
            force_routing_path: None,
        }
    }
}

impl SearchOptions {
    /// Reject out-of-range options before any retrieval happens.
    pub fn validate(&self) -> CairnResult<()> {
        if self.max_results == 0 || self.max_results > MAX_SEARCH_RESULTS {
            return Err(CairnError::invalid(format!(
                "max_results must be within 1..={MAX_SEARCH_RESULTS}, got {}",
                self.max_results
            )));
        }
        if !(0.0..=1.0).contains(&self.min_confidence) || self.min_confidence.is_nan() {
            return Err(CairnError::invalid(format!(
                "min_confidence must be within 0..=1, got {}",
                self.min_confidence
            )));
        }
        let blank_filter = self
            .filter_databases
            .iter()
            .chain(&self.filter_object_types)
            .chain(&self.filter_categories)
            .any(|f| f.trim().is_empty());
        if blank_filter {
            return Err(CairnError::invalid("filters must not contain blank values"));
        }
        Ok(())
    }

    /// Whether any post-retrieval filter is set.
    pub fn has_filters(&self) -> bool {
        !self.filter_databases.is_empty()
            || !self.filter_object_types.is_empty()
            || !self.filter_categories.is_empty()
    }
}

/// A submitted search. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub user_id: String,
    pub options: SearchOptions,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, user_id: impl Into<String>, options: SearchOptions) -> Self {
        Self {
            text: text.into(),
            user_id: user_id.into(),
            options,
        }
    }

    /// Validate query text and options.
    pub fn validate(&self) -> CairnResult<()> {
        validate_query_text(&self.text)?;
        self.options.validate()
    }
}

/// Query text must be non-blank and at most 500 characters.
pub fn validate_query_text(text: &str) -> CairnResult<()> {
    if text.trim().is_empty() {
        return Err(CairnError::invalid("query must not be empty"));
    }
    let chars = text.chars().count();
    if chars > MAX_QUERY_CHARS {
        return Err(CairnError::invalid(format!(
            "query is {chars} characters, maximum is {MAX_QUERY_CHARS}"
        )));
    }
    Ok(())
}

/// Lowercase and collapse whitespace. Used for cache keys and learning logs.
pub fn normalize_query(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
