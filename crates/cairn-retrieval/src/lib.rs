//! # cairn-retrieval
//!
//! Everything between a classified query and a fused ranking: the query
//! classifier, the vector retriever, the five routing strategies behind a
//! dispatch table, the late-stage reranker and reciprocal rank fusion.

pub mod classifier;
pub mod expansion;
pub mod fusion;
pub mod rerank;
pub mod strategies;
pub mod text;
pub mod vector;

pub use classifier::QueryClassifier;
pub use rerank::Reranker;
pub use strategies::{RetrievalStrategy, StrategyContext, StrategyOutput, StrategyTable};
pub use vector::VectorRetriever;
