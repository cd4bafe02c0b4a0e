//! # cairn-core
//!
//! Foundation crate for the Cairn catalog search engine.
//! Defines all types, collaborator traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CairnConfig;
pub use errors::{CairnError, CairnResult};
pub use models::{
    CandidateResult, QueryClassification, RankedResult, RoutingPath, SearchOptions, SearchQuery,
    SearchResponse,
};
