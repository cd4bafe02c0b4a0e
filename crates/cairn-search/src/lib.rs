//! # cairn-search
//!
//! The hybrid search orchestrator and the public engine facade. A query is
//! classified, fanned out to its routing paths concurrently, optionally
//! reranked, fused with reciprocal rank fusion and annotated with lineage
//! and PII information. Responses are cached, stored for follow-ups and
//! export, and handed to the continuous learner.

pub mod annotate;
pub mod autocomplete;
pub mod cache;
pub mod engine;
pub mod export;
pub mod follow_ups;
pub mod orchestrator;

pub use engine::{Collaborators, SearchEngine};
pub use orchestrator::{Orchestrator, SearchOutcome};
