//! Routing strategies against the sample catalog.

use std::sync::Arc;

use cairn_core::config::{GraphConfig, RetrievalConfig};
use cairn_core::errors::{CairnError, RetrievalError};
use cairn_core::models::query::normalize_query;
use cairn_core::models::{PathDetail, RoutingPath, SearchOptions};
use cairn_graph::{GraphStore, TraversalConfig};
use cairn_retrieval::strategies::{
    AgenticStrategy, KeywordStrategy, MetadataStrategy, RelationshipStrategy, SemanticStrategy,
};
use cairn_retrieval::{QueryClassifier, RetrievalStrategy, StrategyContext, StrategyTable, VectorRetriever};
use test_fixtures::{FixtureCatalogSource, MockQueryRewriter, MockVectorIndex};

async fn context(query: &str, options: SearchOptions) -> StrategyContext {
    let store = GraphStore::open(
        Arc::new(FixtureCatalogSource::sample()),
        &GraphConfig::default(),
    )
    .unwrap();
    let classification = QueryClassifier::heuristic_only().classify(query).await.unwrap();
    StrategyContext {
        query: query.to_string(),
        normalized: normalize_query(query),
        classification,
        options,
        graph: store.snapshot().unwrap(),
        limit: 20,
    }
}

fn ids(candidates: &[cairn_core::models::CandidateResult]) -> Vec<&str> {
    candidates.iter().map(|c| c.document_id.as_str()).collect()
}

fn vector(index: Arc<MockVectorIndex>) -> Arc<VectorRetriever> {
    Arc::new(VectorRetriever::new(index))
}

// --- Keyword ---

#[tokio::test]
async fn keyword_prefers_exact_names() {
    let ctx = context("orders", SearchOptions::default()).await;
    let out = KeywordStrategy::new(50).retrieve(&ctx).await.unwrap();
    assert_eq!(out.candidates[0].document_id, "shop.dbo.orders");
    assert!(out
        .candidates
        .windows(2)
        .all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn keyword_without_content_terms_is_empty() {
    let ctx = context("what is the", SearchOptions::default()).await;
    let out = KeywordStrategy::new(50).retrieve(&ctx).await.unwrap();
    assert!(out.candidates.is_empty());
}

// --- Metadata ---

#[tokio::test]
async fn metadata_resolves_column_then_table() {
    let ctx = context("orders.customer_id", SearchOptions::default()).await;
    let out = MetadataStrategy::new().retrieve(&ctx).await.unwrap();
    let found = ids(&out.candidates);
    assert_eq!(&found[..2], &["shop.dbo.orders.customer_id", "shop.dbo.orders"]);
    assert_eq!(out.candidates[0].score, 1.0);
}

#[tokio::test]
async fn metadata_lists_objects_matching_extracted_filters() {
    let ctx = context("views in database finance", SearchOptions::default()).await;
    let out = MetadataStrategy::new().retrieve(&ctx).await.unwrap();
    assert_eq!(ids(&out.candidates), vec!["finance.dbo.monthly_revenue"]);
}

// --- Relationship ---

#[tokio::test]
async fn relationship_walks_both_directions_from_the_named_column() {
    let ctx = context("what flows into PaymentsTable.CardNumber", SearchOptions::default()).await;
    let out = RelationshipStrategy::new(3).retrieve(&ctx).await.unwrap();
    let found = ids(&out.candidates);
    assert_eq!(found[0], "finance.dbo.PaymentsTable.CardNumber");
    assert!(found.contains(&"staging.raw.card_feed.card_number"));
    assert!(found.contains(&"finance.dbo.card_export.card_number"));
    assert!(matches!(
        out.candidates[1].detail,
        PathDetail::Graph { depth: 1, .. }
    ));
}

#[tokio::test]
async fn relationship_without_seeds_is_empty() {
    let ctx = context("downstream of nothing known", SearchOptions::default()).await;
    let out = RelationshipStrategy::new(3).retrieve(&ctx).await.unwrap();
    assert!(out.candidates.is_empty());
}

// --- Semantic ---

#[tokio::test]
async fn semantic_returns_vector_candidates_once_per_document() {
    let ctx = context("customer email address", SearchOptions::default()).await;
    let out = SemanticStrategy::new(vector(Arc::new(MockVectorIndex::sample())), 20)
        .retrieve(&ctx)
        .await
        .unwrap();
    let found = ids(&out.candidates);
    assert!(found.contains(&"shop.dbo.customers.email"));
    let mut unique = found.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), found.len());
    assert!(out.candidates[0].semantic_score().is_some());
}

#[tokio::test]
async fn semantic_applies_option_filters() {
    let options = SearchOptions {
        filter_databases: vec!["crm".into()],
        ..Default::default()
    };
    let ctx = context("customer email address", options).await;
    let out = SemanticStrategy::new(vector(Arc::new(MockVectorIndex::sample())), 20)
        .retrieve(&ctx)
        .await
        .unwrap();
    assert!(!out.candidates.is_empty());
    assert!(out
        .candidates
        .iter()
        .all(|c| c.database.as_deref() == Some("crm")));
}

#[tokio::test]
async fn semantic_reports_unreachable_index() {
    let index = Arc::new(MockVectorIndex::sample());
    index.set_failing(true);
    let ctx = context("customer email address", SearchOptions::default()).await;
    let err = SemanticStrategy::new(vector(index), 20)
        .retrieve(&ctx)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CairnError::RetrievalError(RetrievalError::Unavailable { .. })
    ));
}

// --- Agentic ---

fn agentic(index: Arc<MockVectorIndex>, rewriter: Option<Arc<MockQueryRewriter>>) -> AgenticStrategy {
    AgenticStrategy::new(
        vector(index),
        rewriter.map(|r| r as Arc<dyn cairn_core::traits::IQueryRewriter>),
        20,
        50,
        5,
        60,
        true,
    )
}

#[tokio::test]
async fn agentic_uses_the_rewriter_and_records_steps() {
    let rewriter = Arc::new(MockQueryRewriter::appending("email"));
    let ctx = context("customer contact", SearchOptions::default()).await;
    let out = agentic(Arc::new(MockVectorIndex::sample()), Some(rewriter.clone()))
        .retrieve(&ctx)
        .await
        .unwrap();
    assert_eq!(rewriter.call_count(), 1);
    assert_eq!(out.expanded_query.as_deref(), Some("customer contact email"));
    assert!(!out.candidates.is_empty());
    match &out.candidates[0].detail {
        PathDetail::Agentic { steps } => assert_eq!(steps[0], "rewrite:mock-rewriter"),
        other => panic!("unexpected detail {other:?}"),
    }
}

#[tokio::test]
async fn agentic_falls_back_to_synonyms_and_survives_vector_failure() {
    let index = Arc::new(MockVectorIndex::sample());
    index.set_failing(true);
    let rewriter = Arc::new(MockQueryRewriter::failing());
    let ctx = context("customer pii", SearchOptions::default()).await;
    let out = agentic(index, Some(rewriter)).retrieve(&ctx).await.unwrap();
    assert_eq!(
        out.expanded_query.as_deref(),
        Some("customer pii client contact personal email name")
    );
    let PathDetail::Agentic { steps } = &out.candidates[0].detail else {
        panic!("expected agentic detail");
    };
    assert!(steps.contains(&"expand:synonyms".to_string()));
    assert!(steps.contains(&"vector:unavailable".to_string()));
}

// --- Dispatch table ---

#[test]
fn standard_table_covers_every_path() {
    let table = StrategyTable::standard(
        vector(Arc::new(MockVectorIndex::sample())),
        None,
        &RetrievalConfig::default(),
        TraversalConfig::default(),
    );
    assert_eq!(table.len(), RoutingPath::COUNT);
    for path in RoutingPath::ALL {
        assert_eq!(table.get(path).unwrap().path(), path);
    }
}

#[test]
fn empty_table_reports_missing_strategy() {
    let table = StrategyTable::new();
    assert!(matches!(
        table.get(RoutingPath::Semantic),
        Err(CairnError::RetrievalError(RetrievalError::NoStrategy { .. }))
    ));
}
