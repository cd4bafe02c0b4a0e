//! Property tests for cairn-search: cache key normalization, post-filter
//! consistency and autocomplete bounds.

use std::collections::{BTreeMap, HashSet};

use proptest::prelude::*;

use cairn_core::models::{CandidateResult, CatalogObject, ObjectType, PathDetail, SearchOptions};
use cairn_graph::CatalogGraph;
use cairn_search::autocomplete::{self, RecentQueries};
use cairn_search::cache::cache_key;
use cairn_search::orchestrator::filters;

const DATABASES: &[&str] = &["shop", "finance", "crm", "staging"];
const OBJECT_TYPES: &[&str] = &["table", "column", "view", "procedure", "function"];

fn flip_case(s: &str, upper: bool) -> String {
    if upper {
        s.to_uppercase()
    } else {
        s.to_lowercase()
    }
}

fn candidate(i: usize, database: Option<&str>, object_type: &str) -> CandidateResult {
    CandidateResult {
        document_id: format!("doc{i}"),
        object_type: object_type.to_string(),
        name: format!("doc{i}"),
        score: 1.0,
        detail: PathDetail::Keyword {
            matched_terms: vec![],
        },
        text: String::new(),
        database: database.map(str::to_string),
        category: None,
    }
}

fn object(name: &str) -> CatalogObject {
    CatalogObject {
        id: format!("shop.dbo.{name}"),
        object_type: ObjectType::Table,
        name: name.to_string(),
        database: "shop".into(),
        schema: Some("dbo".into()),
        parent_id: None,
        description: String::new(),
        category: None,
        pii_category: None,
        data_type: None,
        properties: BTreeMap::new(),
    }
}

// =============================================================================
// Cache key: filter order, case and duplicates never change the key
// =============================================================================

proptest! {
    #[test]
    fn cache_key_ignores_filter_order_and_case(
        picks in proptest::sample::subsequence(DATABASES.to_vec(), 0..=DATABASES.len()),
        upper in any::<bool>(),
        max_results in 1usize..=100,
    ) {
        let forward: Vec<String> = picks.iter().map(|d| d.to_string()).collect();
        let mut shuffled: Vec<String> = picks.iter().rev().map(|d| flip_case(d, upper)).collect();
        if let Some(first) = forward.first() {
            shuffled.push(first.clone());
        }
        let a = SearchOptions { max_results, filter_databases: forward, ..Default::default() };
        let b = SearchOptions { max_results, filter_databases: shuffled, ..Default::default() };
        prop_assert_eq!(cache_key("orders", &a), cache_key("orders", &b));
    }

    #[test]
    fn cache_key_separates_result_limits(a in 1usize..=100, b in 1usize..=100) {
        prop_assume!(a != b);
        let x = SearchOptions { max_results: a, ..Default::default() };
        let y = SearchOptions { max_results: b, ..Default::default() };
        prop_assert_ne!(cache_key("orders", &x), cache_key("orders", &y));
    }
}

// =============================================================================
// Post-filters: survivors all pass, and filtering twice changes nothing
// =============================================================================

proptest! {
    #[test]
    fn filtering_is_idempotent(
        rows in proptest::collection::vec(
            (proptest::option::of(0usize..DATABASES.len()), 0usize..OBJECT_TYPES.len()),
            0..40,
        ),
        wanted in proptest::sample::subsequence(DATABASES.to_vec(), 1..=2),
    ) {
        let options = SearchOptions {
            filter_databases: wanted.iter().map(|d| d.to_uppercase()).collect(),
            ..Default::default()
        };
        let mut candidates: Vec<CandidateResult> = rows
            .iter()
            .enumerate()
            .map(|(i, (db, ty))| candidate(i, db.map(|d| DATABASES[d]), OBJECT_TYPES[*ty]))
            .collect();
        let total = candidates.len();

        let removed = filters::apply(&options, &mut candidates);
        prop_assert_eq!(removed + candidates.len(), total);
        prop_assert!(candidates.iter().all(|c| filters::passes(&options, c)));
        prop_assert!(candidates
            .iter()
            .all(|c| wanted.iter().any(|w| c.database.as_deref() == Some(*w))));
        prop_assert_eq!(filters::apply(&options, &mut candidates), 0);
    }
}

// =============================================================================
// Autocomplete: bounded, matching and free of case-insensitive duplicates
// =============================================================================

proptest! {
    #[test]
    fn suggestions_are_bounded_and_unique(
        names in proptest::collection::vec("[a-cA-C_]{1,8}", 0..30),
        recent in proptest::collection::vec("[a-c ]{1,10}", 0..10),
        partial in "[a-c]{1,2}",
        max in 0usize..8,
    ) {
        let mut graph = CatalogGraph::new(1);
        for name in &names {
            graph.add_node(object(name));
        }
        let queries = RecentQueries::new(16);
        for q in &recent {
            queries.record(q);
        }

        let out = autocomplete::suggest(&graph, &queries, &partial, max);
        prop_assert!(out.len() <= max);
        let mut seen = HashSet::new();
        for s in &out {
            prop_assert!(s.to_lowercase().contains(&partial));
            prop_assert!(seen.insert(s.to_lowercase()));
        }
    }
}
