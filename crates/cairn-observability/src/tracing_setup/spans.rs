//! Span definitions per operation: search, classification, retrieval path,
//! graph rebuild, learning update, export.

/// Create a search span.
#[macro_export]
macro_rules! search_span {
    ($query_id:expr, $query:expr) => {
        tracing::info_span!("cairn.search", query_id = %$query_id, query = %$query)
    };
}

/// Create a retrieval path span.
#[macro_export]
macro_rules! path_span {
    ($query_id:expr, $path:expr) => {
        tracing::info_span!("cairn.path", query_id = %$query_id, path = %$path)
    };
}

/// Create a graph rebuild span.
#[macro_export]
macro_rules! rebuild_span {
    ($generation:expr) => {
        tracing::info_span!("cairn.graph_rebuild", generation = $generation)
    };
}

/// Create a learning update span.
#[macro_export]
macro_rules! learning_span {
    ($pending:expr) => {
        tracing::info_span!("cairn.learning", pending = $pending)
    };
}

/// Create an export span.
#[macro_export]
macro_rules! export_span {
    ($query_id:expr, $format:expr) => {
        tracing::info_span!("cairn.export", query_id = %$query_id, format = %$format)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const SEARCH: &str = "cairn.search";
    pub const PATH: &str = "cairn.path";
    pub const GRAPH_REBUILD: &str = "cairn.graph_rebuild";
    pub const LEARNING: &str = "cairn.learning";
    pub const EXPORT: &str = "cairn.export";
}
