//! Property tests for cairn-retrieval: fusion ordering and score invariants.

use std::collections::BTreeMap;

use proptest::prelude::*;

use cairn_core::models::{CandidateResult, PathDetail, RoutingPath};
use cairn_retrieval::fusion;

fn candidate(id: u8, similarity: Option<u8>) -> CandidateResult {
    let detail = match similarity {
        Some(s) => PathDetail::Vector {
            collection: "c".into(),
            similarity: s as f64 / 255.0,
        },
        None => PathDetail::Keyword {
            matched_terms: vec![],
        },
    };
    CandidateResult {
        document_id: format!("doc{id}"),
        object_type: "table".into(),
        name: format!("doc{id}"),
        score: 0.0,
        detail,
        text: String::new(),
        database: None,
        category: None,
    }
}

fn per_path_strategy() -> impl Strategy<Value = BTreeMap<RoutingPath, Vec<CandidateResult>>> {
    prop::collection::vec(
        (
            0_usize..RoutingPath::COUNT,
            prop::collection::vec((0_u8..30, prop::option::of(any::<u8>())), 0..25),
        ),
        0..6,
    )
    .prop_map(|lists| {
        lists
            .into_iter()
            .map(|(p, docs)| {
                (
                    RoutingPath::ALL[p],
                    docs.into_iter().map(|(id, s)| candidate(id, s)).collect(),
                )
            })
            .collect()
    })
}

// =============================================================================
// Ranks are 1..N and scores never increase down the list
// =============================================================================
proptest! {
    #[test]
    fn ranks_are_contiguous_and_scores_non_increasing(per_path in per_path_strategy(), k in 1_u32..200) {
        let fused = fusion::fuse(&per_path, k);
        for (i, r) in fused.iter().enumerate() {
            prop_assert_eq!(r.rank, i + 1);
        }
        for w in fused.windows(2) {
            prop_assert!(w[0].fused_score >= w[1].fused_score);
        }
    }
}

// =============================================================================
// Fused score is the sum of per-path contributions
// =============================================================================
proptest! {
    #[test]
    fn fused_score_is_sum_of_contributions(per_path in per_path_strategy()) {
        for r in fusion::fuse(&per_path, 60) {
            let sum: f64 = r.contributions.values().sum();
            prop_assert!((r.fused_score - sum).abs() < 1e-12);
            prop_assert!(!r.contributions.is_empty());
            for path in r.contributions.keys() {
                prop_assert!(per_path[path].iter().any(|c| c.document_id == r.document_id));
            }
        }
    }
}

// =============================================================================
// Every input document appears exactly once; output is deterministic
// =============================================================================
proptest! {
    #[test]
    fn fusion_is_deterministic_and_complete(per_path in per_path_strategy()) {
        let first = fusion::fuse(&per_path, 60);
        let second = fusion::fuse(&per_path, 60);
        prop_assert_eq!(&first, &second);

        let mut expected: Vec<&str> = per_path
            .values()
            .flatten()
            .map(|c| c.document_id.as_str())
            .collect();
        expected.sort();
        expected.dedup();
        let mut got: Vec<&str> = first.iter().map(|r| r.document_id.as_str()).collect();
        got.sort();
        prop_assert_eq!(got, expected);
    }
}
