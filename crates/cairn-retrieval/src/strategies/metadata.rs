//! Metadata path: exact catalog lookups on identifiers, entity names and
//! extracted filters.

use async_trait::async_trait;

use cairn_core::errors::CairnResult;
use cairn_core::models::{
    CandidateResult, CatalogObject, ExtractedFilters, PathDetail, RoutingPath,
};
use cairn_graph::CatalogGraph;

use super::{candidate, sort_and_dedup, RetrievalStrategy, StrategyContext, StrategyOutput};

const RESOLVED: f64 = 1.0;
const PARENT: f64 = 0.9;
const ENTITY_NAME: f64 = 0.85;
const AMBIGUOUS_SUFFIX: f64 = 0.8;
const CHILD: f64 = 0.7;
const FILTER_MATCH: f64 = 0.4;

#[derive(Default)]
pub struct MetadataStrategy;

impl MetadataStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RetrievalStrategy for MetadataStrategy {
    fn path(&self) -> RoutingPath {
        RoutingPath::Metadata
    }

    async fn retrieve(&self, ctx: &StrategyContext) -> CairnResult<StrategyOutput> {
        let graph = ctx.graph.as_ref();
        let classification = &ctx.classification;
        let mut candidates = Vec::new();

        for identifier in &classification.filters.qualified_names {
            lookup_identifier(graph, identifier, &mut candidates);
        }

        for entity in &classification.entities {
            if entity.contains('.') {
                lookup_identifier(graph, entity, &mut candidates);
                continue;
            }
            for object in graph.objects().filter(|o| o.name.eq_ignore_ascii_case(entity)) {
                candidates.push(matched(object, ENTITY_NAME, "name"));
            }
        }

        let filters = &classification.filters;
        if !(filters.databases.is_empty()
            && filters.object_types.is_empty()
            && filters.categories.is_empty())
        {
            for object in graph.objects() {
                if let Some(fields) = filter_fields(object, filters) {
                    candidates.push(candidate(
                        object,
                        FILTER_MATCH,
                        PathDetail::Metadata {
                            matched_fields: fields,
                        },
                    ));
                }
            }
        }

        sort_and_dedup(&mut candidates);
        candidates.truncate(ctx.limit.max(1));
        Ok(StrategyOutput::new(candidates))
    }
}

fn lookup_identifier(graph: &CatalogGraph, identifier: &str, out: &mut Vec<CandidateResult>) {
    let Some(resolved) = graph.resolve(identifier) else {
        return;
    };
    out.push(matched(resolved, RESOLVED, "id"));
    if let Some(parent) = resolved.parent_id.as_deref().and_then(|p| graph.get(p)) {
        out.push(matched(parent, PARENT, "parent"));
    }
    for child in graph.children_of(&resolved.id) {
        out.push(matched(child, CHILD, "parent_id"));
    }

    let dotted = format!(".{}", identifier.trim().to_lowercase());
    for other in graph.objects() {
        if other.id != resolved.id && other.id.to_lowercase().ends_with(&dotted) {
            out.push(matched(other, AMBIGUOUS_SUFFIX, "id"));
        }
    }
}

/// Which extracted filters `object` satisfies; `None` unless every
/// non-empty filter group matches.
fn filter_fields(
    object: &CatalogObject,
    filters: &ExtractedFilters,
) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    if !filters.databases.is_empty() {
        if !filters.databases.iter().any(|d| d.eq_ignore_ascii_case(&object.database)) {
            return None;
        }
        fields.push("database".to_string());
    }
    if !filters.object_types.is_empty() {
        if !filters.object_types.iter().any(|t| t == object.object_type.as_str()) {
            return None;
        }
        fields.push("object_type".to_string());
    }
    if !filters.categories.is_empty() {
        let category = object.category.as_deref().unwrap_or_default();
        if !filters.categories.iter().any(|c| c.eq_ignore_ascii_case(category)) {
            return None;
        }
        fields.push("category".to_string());
    }
    Some(fields)
}

fn matched(object: &CatalogObject, score: f64, field: &str) -> CandidateResult {
    candidate(
        object,
        score,
        PathDetail::Metadata {
            matched_fields: vec![field.to_string()],
        },
    )
}
