//! The five retrieval strategies a query can be dispatched to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A retrieval strategy.
///
/// `Keyword` and `Metadata` are deterministic filters over the catalog,
/// `Semantic` is embedding similarity, `Relationship` is graph traversal and
/// `Agentic` is the multi-step fallback for ambiguous queries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RoutingPath {
    Keyword,
    Semantic,
    Relationship,
    Metadata,
    Agentic,
}

impl RoutingPath {
    pub const COUNT: usize = 5;

    pub const ALL: [RoutingPath; 5] = [
        Self::Keyword,
        Self::Semantic,
        Self::Relationship,
        Self::Metadata,
        Self::Agentic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Semantic => "semantic",
            Self::Relationship => "relationship",
            Self::Metadata => "metadata",
            Self::Agentic => "agentic",
        }
    }

    /// Parse from the serialized name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Some(Self::Keyword),
            "semantic" => Some(Self::Semantic),
            "relationship" => Some(Self::Relationship),
            "metadata" => Some(Self::Metadata),
            "agentic" => Some(Self::Agentic),
            _ => None,
        }
    }

    /// Whether this path is a deterministic filter (no external calls).
    pub fn is_deterministic(&self) -> bool {
        matches!(self, Self::Keyword | Self::Metadata)
    }
}

impl fmt::Display for RoutingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
