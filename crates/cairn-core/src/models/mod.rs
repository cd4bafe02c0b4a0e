//! Data model shared by every Cairn subsystem.

pub mod candidate;
pub mod catalog;
pub mod classification;
pub mod degradation_event;
pub mod export;
pub mod graph;
pub mod learning;
pub mod query;
pub mod ranked;
pub mod response;
pub mod routing;

pub use candidate::{CandidateResult, PathDetail};
pub use catalog::{CatalogDependency, CatalogObject, EdgeKind, ObjectType};
pub use classification::{ClassificationSource, ComplexityTier, ExtractedFilters, QueryClassification};
pub use degradation_event::DegradationEvent;
pub use export::{ExportArtifact, ExportFormat, ExportOptions};
pub use graph::{
    GraphStats, LineageDirection, LineagePath, LineageSummary, NodeAnnotation, PiiFlowPath,
    TraversalHit,
};
pub use learning::{
    CategorySuggestion, InteractionType, LearningAnalytics, LearningEvent, LearningInteraction,
    ShownResponse, ShownResult,
};
pub use query::{SearchOptions, SearchQuery};
pub use ranked::RankedResult;
pub use response::{
    ExecutionMetadata, FollowUpSuggestion, PathOutcome, PathStatus, RequestState, SearchResponse,
    SearchResultItem, StageTimings,
};
pub use routing::RoutingPath;
