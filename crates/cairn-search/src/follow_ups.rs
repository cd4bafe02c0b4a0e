//! Follow-up query suggestions, derived from the results, the extracted
//! filters and how confident the routing decision was.

use std::collections::HashSet;

use cairn_core::constants::MAX_FOLLOW_UPS;
use cairn_core::models::{
    FollowUpSuggestion, QueryClassification, RoutingPath, SearchResultItem,
};

/// Classifications below this confidence get a rephrase suggestion.
const UNCERTAIN_CONFIDENCE: f64 = 0.5;

/// At most `max` suggestions (never more than five), most specific first.
pub fn suggest(
    query: &str,
    classification: &QueryClassification,
    results: &[SearchResultItem],
    max: usize,
) -> Vec<FollowUpSuggestion> {
    let mut out: Vec<FollowUpSuggestion> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut push = |text: String, rationale: String, path: RoutingPath| {
        if seen.insert(text.to_lowercase()) {
            out.push(FollowUpSuggestion {
                text,
                rationale,
                routing_path: Some(path),
            });
        }
    };

    if let Some(pii) = results.iter().find(|r| r.contains_pii) {
        let category = pii.pii_category.as_deref().unwrap_or("personal");
        push(
            format!("what does {} flow into", pii.document_id),
            format!("{} holds {category} data", pii.document_id),
            RoutingPath::Relationship,
        );
    }

    if let Some(top) = results.first() {
        if classification.primary != RoutingPath::Relationship {
            push(
                format!("what depends on {}", top.document_id),
                "explore dependents of the top result".to_string(),
                RoutingPath::Relationship,
            );
        }
        if top.object_type == "table" {
            push(
                format!("columns of {}", top.document_id),
                "list the columns of the top table".to_string(),
                RoutingPath::Metadata,
            );
        }
    }

    if let Some(database) = classification.filters.databases.first() {
        let other = match results.first().map(|r| r.object_type.as_str()) {
            Some("table") => "views",
            _ => "tables",
        };
        push(
            format!("{other} in database {database}"),
            format!("browse other objects in {database}"),
            RoutingPath::Metadata,
        );
    }

    for entity in classification.entities.iter().take(1) {
        if results.is_empty() {
            push(
                format!("{entity} lineage"),
                format!("no direct match for {entity}; look at what surrounds it"),
                RoutingPath::Relationship,
            );
        }
    }

    let uncertain =
        classification.is_degraded() || classification.confidence < UNCERTAIN_CONFIDENCE;
    if (uncertain || results.is_empty()) && classification.primary != RoutingPath::Semantic {
        let rationale = if results.is_empty() {
            "no results; retry as a semantic search".to_string()
        } else {
            format!("routing was uncertain ({}); try a semantic search", classification.rationale)
        };
        push(format!("describe {}", query.trim()), rationale, RoutingPath::Semantic);
    }

    out.truncate(max.min(MAX_FOLLOW_UPS));
    out
}
