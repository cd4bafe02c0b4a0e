//! Vector retriever against the in-memory index.

use std::sync::Arc;

use cairn_core::constants::{DESCRIPTION_COLLECTION, SIGNATURE_COLLECTION};
use cairn_core::errors::{CairnError, RetrievalError};
use cairn_retrieval::vector::filter_map;
use cairn_retrieval::VectorRetriever;
use test_fixtures::{sample_catalog, MockVectorIndex};

#[tokio::test]
async fn top_k_must_be_in_range() {
    let retriever = VectorRetriever::new(Arc::new(MockVectorIndex::sample()));
    for top_k in [0, 101] {
        let err = retriever
            .search_natural_language("orders", top_k, None)
            .await
            .unwrap_err();
        assert!(matches!(err, CairnError::InvalidInput { .. }));
    }
    assert!(retriever.search_structured("orders", 100, None).await.is_ok());
}

#[tokio::test]
async fn hybrid_is_the_union_of_both_collections() {
    let retriever = VectorRetriever::new(Arc::new(MockVectorIndex::sample()));
    let described = retriever
        .search_natural_language("card number", 10, None)
        .await
        .unwrap();
    let signed = retriever.search_structured("card number", 10, None).await.unwrap();
    let hybrid = retriever.search_hybrid("card number", 10, None).await.unwrap();

    assert_eq!(hybrid.len(), described.len() + signed.len());
    assert!(hybrid.iter().any(|h| h.collection == DESCRIPTION_COLLECTION));
    assert!(hybrid.iter().any(|h| h.collection == SIGNATURE_COLLECTION));
}

#[tokio::test]
async fn unreachable_index_is_an_error_not_an_empty_list() {
    let index = Arc::new(MockVectorIndex::sample());
    index.set_failing(true);
    let retriever = VectorRetriever::new(index);
    let err = retriever.search_hybrid("orders", 10, None).await.unwrap_err();
    assert!(matches!(
        err,
        CairnError::RetrievalError(RetrievalError::Unavailable { .. })
    ));
}

#[tokio::test]
async fn index_and_remove_objects() {
    let index = Arc::new(MockVectorIndex::new());
    let retriever = VectorRetriever::new(index.clone());
    let catalog = sample_catalog();

    let indexed = retriever.index_catalog(&catalog.objects).await.unwrap();
    assert_eq!(indexed, catalog.objects.len());
    assert_eq!(index.len(DESCRIPTION_COLLECTION), catalog.objects.len());
    assert_eq!(index.len(SIGNATURE_COLLECTION), catalog.objects.len());

    retriever
        .remove_objects(&["shop.dbo.orders".to_string()])
        .await
        .unwrap();
    assert_eq!(index.len(DESCRIPTION_COLLECTION), catalog.objects.len() - 1);
    let hits = retriever.search_hybrid("orders", 50, None).await.unwrap();
    assert!(hits.iter().all(|h| h.document_id != "shop.dbo.orders"));
}

#[tokio::test]
async fn filters_restrict_hits() {
    let retriever = VectorRetriever::new(Arc::new(MockVectorIndex::sample()));
    let filters = filter_map(&["finance".to_string()], &[], &[]);
    let hits = retriever
        .search_hybrid("card number", 20, filters.as_ref())
        .await
        .unwrap();
    assert!(!hits.is_empty());
    assert!(hits.iter().all(|h| h.payload["database"] == "finance"));
}

#[test]
fn empty_filters_are_none() {
    assert!(filter_map(&[], &[], &[]).is_none());
    let filters = filter_map(&[], &["table".to_string()], &["sales".to_string()]).unwrap();
    assert_eq!(filters.len(), 2);
}
