//! Late-stage reranking with an external text scorer.
//!
//! The scorer sees each candidate's text once, in a single batch, under its
//! own timeout. Any failure leaves the caller with the fused order.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use cairn_core::errors::{CairnError, CairnResult};
use cairn_core::models::{CandidateResult, RankedResult, RoutingPath};
use cairn_core::traits::ITextScorer;

pub struct Reranker {
    scorer: Arc<dyn ITextScorer>,
    max_candidates: usize,
    timeout: Duration,
}

impl Reranker {
    pub fn new(scorer: Arc<dyn ITextScorer>, max_candidates: usize, timeout: Duration) -> Self {
        Self {
            scorer,
            max_candidates: max_candidates.max(1),
            timeout,
        }
    }

    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    /// Score `candidates` against `query` and return at most `top_k`,
    /// best first. Duplicate ids keep their first occurrence.
    pub async fn rerank(
        &self,
        query: &str,
        candidates: &[CandidateResult],
        top_k: usize,
    ) -> CairnResult<Vec<RankedResult>> {
        let mut seen = HashSet::new();
        let unique: Vec<&CandidateResult> = candidates
            .iter()
            .filter(|c| seen.insert(c.document_id.as_str()))
            .take(self.max_candidates)
            .collect();
        if unique.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let texts: Vec<String> = unique.iter().map(|c| scorer_text(c)).collect();
        let scores = match tokio::time::timeout(self.timeout, self.scorer.score_batch(query, &texts)).await {
            Ok(Ok(scores)) => scores,
            Ok(Err(e)) => {
                warn!(scorer = self.scorer.name(), error = %e, "reranker failed");
                return Err(CairnError::RerankUnavailable {
                    reason: format!("{} failed: {e}", self.scorer.name()),
                });
            }
            Err(_) => {
                warn!(scorer = self.scorer.name(), "reranker timed out");
                return Err(CairnError::RerankUnavailable {
                    reason: format!(
                        "{} timed out after {}ms",
                        self.scorer.name(),
                        self.timeout.as_millis()
                    ),
                });
            }
        };
        if scores.len() != unique.len() {
            return Err(CairnError::RerankUnavailable {
                reason: format!(
                    "{} returned {} scores for {} texts",
                    self.scorer.name(),
                    scores.len(),
                    unique.len()
                ),
            });
        }

        let mut ranked: Vec<RankedResult> = unique
            .iter()
            .zip(scores)
            .map(|(c, score)| RankedResult {
                document_id: c.document_id.clone(),
                fused_score: if score.is_nan() { 0.0 } else { score },
                contributions: BTreeMap::new(),
                rank: 0,
                semantic_score: c.semantic_score(),
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.fused_score
                .partial_cmp(&a.fused_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        ranked.truncate(top_k);
        for (i, r) in ranked.iter_mut().enumerate() {
            r.rank = i + 1;
        }
        debug!(reranked = ranked.len(), "rerank complete");
        Ok(ranked)
    }
}

/// Reorder every path list by reranked rank. Candidates the reranker did not
/// see keep their relative order after the reranked ones.
pub fn apply_to_paths(
    per_path: &mut BTreeMap<RoutingPath, Vec<CandidateResult>>,
    reranked: &[RankedResult],
) {
    let positions: HashMap<&str, usize> = reranked
        .iter()
        .map(|r| (r.document_id.as_str(), r.rank))
        .collect();
    for candidates in per_path.values_mut() {
        candidates.sort_by_key(|c| positions.get(c.document_id.as_str()).copied().unwrap_or(usize::MAX));
    }
}

/// Round-robin across path lists so the bounded rerank window sees the head
/// of every path rather than the whole of the first one.
pub fn interleave(per_path: &BTreeMap<RoutingPath, Vec<CandidateResult>>) -> Vec<CandidateResult> {
    let longest = per_path.values().map(Vec::len).max().unwrap_or(0);
    let mut out = Vec::new();
    for i in 0..longest {
        for candidates in per_path.values() {
            if let Some(c) = candidates.get(i) {
                out.push(c.clone());
            }
        }
    }
    out
}

fn scorer_text(candidate: &CandidateResult) -> String {
    if candidate.text.is_empty() {
        candidate.name.clone()
    } else {
        format!("{} {}", candidate.name, candidate.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::models::PathDetail;

    fn cand(id: &str) -> CandidateResult {
        CandidateResult {
            document_id: id.into(),
            object_type: "table".into(),
            name: id.into(),
            score: 1.0,
            detail: PathDetail::Keyword { matched_terms: vec![] },
            text: String::new(),
            database: None,
            category: None,
        }
    }

    #[test]
    fn apply_moves_reranked_first_and_keeps_the_rest_stable() {
        let mut per_path = BTreeMap::new();
        per_path.insert(RoutingPath::Keyword, vec![cand("a"), cand("b"), cand("c"), cand("d")]);
        let reranked = vec![
            RankedResult {
                document_id: "c".into(),
                fused_score: 0.9,
                contributions: BTreeMap::new(),
                rank: 1,
                semantic_score: None,
            },
            RankedResult {
                document_id: "a".into(),
                fused_score: 0.5,
                contributions: BTreeMap::new(),
                rank: 2,
                semantic_score: None,
            },
        ];
        apply_to_paths(&mut per_path, &reranked);
        let ids: Vec<_> = per_path[&RoutingPath::Keyword]
            .iter()
            .map(|c| c.document_id.as_str())
            .collect();
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn interleave_alternates_paths() {
        let mut per_path = BTreeMap::new();
        per_path.insert(RoutingPath::Keyword, vec![cand("k1"), cand("k2"), cand("k3")]);
        per_path.insert(RoutingPath::Semantic, vec![cand("s1")]);
        let ids: Vec<_> = interleave(&per_path)
            .into_iter()
            .map(|c| c.document_id)
            .collect();
        assert_eq!(ids, vec!["k1", "s1", "k2", "k3"]);
    }
}
