//! Reciprocal Rank Fusion: score = Σ 1/(k + rank_i)
//!
//! Combines per-path candidate lists into one ranking. Raw path scores are
//! ignored; only each document's position within a path counts.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use cairn_core::models::{CandidateResult, RankedResult, RoutingPath};

#[derive(Default)]
struct Accumulator {
    contributions: BTreeMap<RoutingPath, f64>,
    semantic: Option<f64>,
}

/// Fuse per-path candidate lists.
///
/// Each list is assumed to be ordered best-first. A document appearing more
/// than once in the same list only counts at its first position. Ties on the
/// fused score break on the best raw semantic similarity, then document id.
pub fn fuse(per_path: &BTreeMap<RoutingPath, Vec<CandidateResult>>, k: u32) -> Vec<RankedResult> {
    let mut acc: HashMap<&str, Accumulator> = HashMap::new();

    for (path, candidates) in per_path {
        for (position, candidate) in candidates.iter().enumerate() {
            let entry = acc.entry(candidate.document_id.as_str()).or_default();
            if let Some(similarity) = candidate.semantic_score() {
                entry.semantic = Some(entry.semantic.map_or(similarity, |s| s.max(similarity)));
            }
            if entry.contributions.contains_key(path) {
                continue;
            }
            let rank = position + 1;
            entry
                .contributions
                .insert(*path, 1.0 / (k as f64 + rank as f64));
        }
    }

    let mut fused: Vec<RankedResult> = acc
        .into_iter()
        .map(|(id, a)| RankedResult {
            document_id: id.to_string(),
            fused_score: a.contributions.values().sum(),
            contributions: a.contributions,
            rank: 0,
            semantic_score: a.semantic,
        })
        .collect();

    fused.sort_by(compare);
    for (i, result) in fused.iter_mut().enumerate() {
        result.rank = i + 1;
    }
    fused
}

/// Descending fused score, then descending semantic similarity (absent sorts
/// last), then ascending document id.
pub fn compare(a: &RankedResult, b: &RankedResult) -> Ordering {
    b.fused_score
        .partial_cmp(&a.fused_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| {
            let sa = a.semantic_score.unwrap_or(f64::NEG_INFINITY);
            let sb = b.semantic_score.unwrap_or(f64::NEG_INFINITY);
            sb.partial_cmp(&sa).unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.document_id.cmp(&b.document_id))
}
