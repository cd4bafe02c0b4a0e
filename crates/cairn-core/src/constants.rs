/// Cairn engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum accepted query length, in characters.
pub const MAX_QUERY_CHARS: usize = 500;

/// Maximum traversal depth for dependency/dependent queries.
pub const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Maximum number of nodes a lineage path search may visit.
pub const LINEAGE_VISIT_BUDGET: usize = 10_000;

/// Upper bound on top-K for vector queries.
pub const MAX_VECTOR_TOP_K: usize = 100;

/// Upper bound on results returned by a single search.
pub const MAX_SEARCH_RESULTS: usize = 100;

/// Upper bound on candidates handed to the reranker.
pub const MAX_RERANK_CANDIDATES: usize = 50;

/// Maximum follow-up suggestions attached to a response.
pub const MAX_FOLLOW_UPS: usize = 5;

/// Collection holding free-text object descriptions.
pub const DESCRIPTION_COLLECTION: &str = "catalog_descriptions";

/// Collection holding structured schema signatures.
pub const SIGNATURE_COLLECTION: &str = "catalog_signatures";
