//! Turn fused rankings into response items and attach lineage/PII
//! annotations to the top results.

use std::collections::HashMap;

use tracing::debug;

use cairn_core::models::{
    CandidateResult, PiiFlowPath, RankedResult, SearchOptions, SearchResultItem,
};
use cairn_graph::{CatalogGraph, TraversalEngine};

/// Items plus the PII flows gathered while annotating them.
#[derive(Debug, Default)]
pub struct Annotated {
    pub items: Vec<SearchResultItem>,
    pub pii_flows: Vec<PiiFlowPath>,
    /// Graph annotation calls made; at most one per result.
    pub graph_calls: usize,
}

/// How far annotation goes.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationLimits {
    /// Only this many leading results are annotated.
    pub top_n: usize,
    pub depth: usize,
}

/// Build one item per ranked result, in rank order.
///
/// Identity, description and PII tag come from the graph snapshot when the
/// object is known there, otherwise from the candidate that produced it.
/// Lineage and PII flows are only computed for the first `limits.top_n`
/// results and only when the options ask for them.
pub fn annotate(
    graph: &CatalogGraph,
    traversal: &TraversalEngine,
    ranked: &[RankedResult],
    candidates: &HashMap<String, CandidateResult>,
    options: &SearchOptions,
    limits: AnnotationLimits,
) -> Annotated {
    let wants_graph = options.include_lineage || options.include_pii_flows;
    let depth = limits.depth.min(traversal.config().max_depth);
    let mut out = Annotated::default();

    for (i, result) in ranked.iter().enumerate() {
        let object = graph.get(&result.document_id);
        let candidate = candidates.get(&result.document_id);

        let mut item = SearchResultItem {
            document_id: result.document_id.clone(),
            object_type: object
                .map(|o| o.object_type.to_string())
                .or_else(|| candidate.map(|c| c.object_type.clone()))
                .unwrap_or_default(),
            name: object
                .map(|o| o.name.clone())
                .or_else(|| candidate.map(|c| c.name.clone()))
                .unwrap_or_else(|| result.document_id.clone()),
            description: object
                .map(|o| o.description.clone())
                .or_else(|| candidate.map(|c| c.text.clone()))
                .unwrap_or_default(),
            relevance_score: result.fused_score,
            rank: result.rank,
            contributions: result.contributions.clone(),
            database: object
                .map(|o| o.database.clone())
                .or_else(|| candidate.and_then(|c| c.database.clone())),
            category: object
                .and_then(|o| o.category.clone())
                .or_else(|| candidate.and_then(|c| c.category.clone())),
            lineage: None,
            contains_pii: object.is_some_and(|o| o.pii_category.is_some()),
            pii_category: object.and_then(|o| o.pii_category.clone()),
        };

        if wants_graph && i < limits.top_n && object.is_some() {
            out.graph_calls += 1;
            match traversal.annotate(graph, &result.document_id, depth) {
                Ok(annotation) => {
                    if options.include_lineage {
                        item.lineage = Some(annotation.lineage);
                    }
                    if options.include_pii_flows {
                        for flow in annotation.pii_flows {
                            if !out.pii_flows.contains(&flow) {
                                out.pii_flows.push(flow);
                            }
                        }
                    }
                }
                Err(e) => debug!(document_id = %result.document_id, error = %e, "annotation skipped"),
            }
        }
        out.items.push(item);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use cairn_core::models::{CatalogDependency, CatalogObject, EdgeKind, ObjectType, PathDetail};

    fn object(id: &str, pii: Option<&str>) -> CatalogObject {
        CatalogObject {
            id: id.into(),
            object_type: ObjectType::Column,
            name: id.rsplit('.').next().unwrap_or(id).into(),
            database: "db".into(),
            schema: Some("dbo".into()),
            parent_id: None,
            description: format!("{id} column"),
            category: None,
            pii_category: pii.map(str::to_string),
            data_type: None,
            properties: BTreeMap::new(),
        }
    }

    fn graph() -> CatalogGraph {
        let mut g = CatalogGraph::new(1);
        g.add_node(object("db.dbo.a.x", Some("email")));
        g.add_node(object("db.dbo.b.x", None));
        g.add_edge(&CatalogDependency {
            source_id: "db.dbo.a.x".into(),
            target_id: "db.dbo.b.x".into(),
            kind: EdgeKind::FlowsInto,
        })
        .unwrap();
        g
    }

    fn ranked(ids: &[&str]) -> Vec<RankedResult> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| RankedResult {
                document_id: id.to_string(),
                fused_score: 1.0 / (i + 1) as f64,
                contributions: BTreeMap::new(),
                rank: i + 1,
                semantic_score: None,
            })
            .collect()
    }

    fn limits(top_n: usize) -> AnnotationLimits {
        AnnotationLimits { top_n, depth: 3 }
    }

    #[test]
    fn unknown_ids_fall_back_to_candidate_fields() {
        let mut candidates = HashMap::new();
        candidates.insert(
            "ext.doc".to_string(),
            CandidateResult {
                document_id: "ext.doc".into(),
                object_type: "table".into(),
                name: "doc".into(),
                score: 0.5,
                detail: PathDetail::Vector {
                    collection: "c".into(),
                    similarity: 0.5,
                },
                text: "from the index".into(),
                database: Some("ext".into()),
                category: None,
            },
        );
        let out = annotate(
            &graph(),
            &TraversalEngine::default(),
            &ranked(&["ext.doc"]),
            &candidates,
            &SearchOptions::default(),
            limits(10),
        );
        assert_eq!(out.items[0].name, "doc");
        assert_eq!(out.items[0].description, "from the index");
        assert!(!out.items[0].contains_pii);
        assert_eq!(out.graph_calls, 0);
    }

    #[test]
    fn only_top_n_results_are_annotated() {
        let options = SearchOptions {
            include_lineage: true,
            include_pii_flows: true,
            ..Default::default()
        };
        let out = annotate(
            &graph(),
            &TraversalEngine::default(),
            &ranked(&["db.dbo.a.x", "db.dbo.b.x"]),
            &HashMap::new(),
            &options,
            limits(1),
        );
        assert_eq!(out.graph_calls, 1);
        assert_eq!(out.items[0].lineage.as_ref().unwrap().downstream, vec!["db.dbo.b.x"]);
        assert!(out.items[1].lineage.is_none());
        assert!(out.items[0].contains_pii);
        assert_eq!(out.pii_flows.len(), 1);
        assert_eq!(out.pii_flows[0].destination_id, "db.dbo.b.x");
    }

    #[test]
    fn no_graph_calls_without_lineage_or_pii_options() {
        let out = annotate(
            &graph(),
            &TraversalEngine::default(),
            &ranked(&["db.dbo.a.x"]),
            &HashMap::new(),
            &SearchOptions::default(),
            limits(10),
        );
        assert_eq!(out.graph_calls, 0);
        assert!(out.items[0].contains_pii);
        assert_eq!(out.items[0].pii_category.as_deref(), Some("email"));
    }
}
