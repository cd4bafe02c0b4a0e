//! Collaborator interfaces. Every external system the engine talks to sits
//! behind one of these traits so tests can swap in fixtures.

mod catalog_source;
mod classification_service;
mod query_rewriter;
mod text_scorer;
mod vector_index;

pub use catalog_source::ICatalogSource;
pub use classification_service::{IClassificationService, ServiceClassification};
pub use query_rewriter::IQueryRewriter;
pub use text_scorer::ITextScorer;
pub use vector_index::{IVectorIndex, VectorFilter, VectorHit, VectorRecord};
