//! Keyword path: term matching over names, ids and descriptions.

use async_trait::async_trait;
use rayon::prelude::*;

use cairn_core::errors::CairnResult;
use cairn_core::models::{CandidateResult, CatalogObject, PathDetail, RoutingPath};
use cairn_graph::CatalogGraph;

use super::{candidate, sort_and_dedup, RetrievalStrategy, StrategyContext, StrategyOutput};
use crate::text;

const NAME_EXACT: f64 = 3.0;
const NAME_CONTAINS: f64 = 2.0;
const ID_OR_DESCRIPTION: f64 = 1.0;

pub struct KeywordStrategy {
    top_k: usize,
}

impl KeywordStrategy {
    pub fn new(top_k: usize) -> Self {
        Self { top_k: top_k.max(1) }
    }
}

#[async_trait]
impl RetrievalStrategy for KeywordStrategy {
    fn path(&self) -> RoutingPath {
        RoutingPath::Keyword
    }

    async fn retrieve(&self, ctx: &StrategyContext) -> CairnResult<StrategyOutput> {
        let top_k = self.top_k.min(ctx.limit.max(1));
        Ok(StrategyOutput::new(search(&ctx.graph, &ctx.query, top_k)))
    }
}

/// Score every catalog object against the terms of `query`, best first.
pub fn search(graph: &CatalogGraph, query: &str, top_k: usize) -> Vec<CandidateResult> {
    let terms = text::terms(query);
    if terms.is_empty() {
        return Vec::new();
    }
    let objects: Vec<&CatalogObject> = graph.objects().collect();
    let mut candidates: Vec<_> = objects
        .par_iter()
        .filter_map(|object| {
            let (score, matched) = score_object(object, &terms);
            (score > 0.0)
                .then(|| candidate(object, score, PathDetail::Keyword { matched_terms: matched }))
        })
        .collect();
    sort_and_dedup(&mut candidates);
    candidates.truncate(top_k);
    candidates
}

/// Mean per-term score and the terms that matched.
pub fn score_object(object: &CatalogObject, terms: &[String]) -> (f64, Vec<String>) {
    let name = object.name.to_lowercase();
    let id = object.id.to_lowercase();
    let description = object.description.to_lowercase();

    let mut total = 0.0;
    let mut matched = Vec::new();
    for term in terms {
        let score = if name == *term {
            NAME_EXACT
        } else if name.contains(term.as_str()) {
            NAME_CONTAINS
        } else if id.contains(term.as_str()) || description.contains(term.as_str()) {
            ID_OR_DESCRIPTION
        } else {
            0.0
        };
        if score > 0.0 {
            total += score;
            matched.push(term.clone());
        }
    }
    (total / terms.len() as f64, matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::models::ObjectType;

    fn object(id: &str, name: &str, description: &str) -> CatalogObject {
        CatalogObject {
            id: id.into(),
            object_type: ObjectType::Table,
            name: name.into(),
            database: "shop".into(),
            schema: None,
            parent_id: None,
            description: description.into(),
            category: None,
            pii_category: None,
            data_type: None,
            properties: Default::default(),
        }
    }

    #[test]
    fn exact_name_beats_partial_and_description() {
        let terms = vec!["orders".to_string()];
        let exact = score_object(&object("shop.dbo.orders", "orders", ""), &terms).0;
        let partial = score_object(&object("shop.dbo.old_orders", "old_orders", ""), &terms).0;
        let described = score_object(&object("shop.dbo.x", "x", "all orders"), &terms).0;
        assert!(exact > partial && partial > described && described > 0.0);
    }

    #[test]
    fn unmatched_terms_dilute_the_score() {
        let o = object("shop.dbo.orders", "orders", "");
        let one = score_object(&o, &["orders".to_string()]).0;
        let two = score_object(&o, &["orders".to_string(), "zebra".to_string()]).0;
        assert_eq!(two, one / 2.0);
    }
}
