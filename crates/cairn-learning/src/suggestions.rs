//! Advisory category suggestions from click behaviour.
//!
//! A document whose clicks come predominantly from queries about a category
//! other than its own is a candidate for re-categorization. Nothing here
//! writes catalog metadata.

use std::collections::{BTreeMap, HashMap};

use cairn_core::models::{CategorySuggestion, InteractionType, LearningEvent, ShownResponse};

use crate::log::LogEntry;

#[derive(Default)]
struct DocumentClicks {
    current: Option<String>,
    total: usize,
    by_category: BTreeMap<String, usize>,
}

/// Suggestions with at least `min_support` categorized clicks and a
/// dominant-category share of at least `min_confidence`, best first.
pub fn suggest(
    entries: &[LogEntry],
    max: usize,
    min_confidence: f64,
    min_support: usize,
) -> Vec<CategorySuggestion> {
    let responses: HashMap<&str, &ShownResponse> = entries
        .iter()
        .filter_map(|e| match &e.event {
            LearningEvent::ResponseShown(r) => Some((r.query_id.as_str(), r)),
            LearningEvent::Interaction(_) => None,
        })
        .collect();

    let mut docs: BTreeMap<String, DocumentClicks> = BTreeMap::new();
    for entry in entries {
        let LearningEvent::Interaction(i) = &entry.event else {
            continue;
        };
        if i.interaction_type != InteractionType::Click {
            continue;
        }
        let (Some(doc), Some(response)) =
            (i.document_id.as_deref(), responses.get(i.query_id.as_str()))
        else {
            continue;
        };
        if response.query_categories.is_empty() {
            continue;
        }
        let stats = docs.entry(doc.to_string()).or_default();
        if let Some(shown) = response.results.iter().find(|r| r.document_id == doc) {
            if shown.category.is_some() {
                stats.current = shown.category.clone();
            }
        }
        stats.total += 1;
        for category in &response.query_categories {
            *stats.by_category.entry(category.to_lowercase()).or_default() += 1;
        }
    }

    let mut suggestions: Vec<CategorySuggestion> = docs
        .into_iter()
        .filter_map(|(document_id, stats)| {
            if stats.total < min_support {
                return None;
            }
            // Highest count; ties go to the alphabetically first category.
            let (top, count) = stats
                .by_category
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))?;
            let already = stats
                .current
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(top));
            if already {
                return None;
            }
            let confidence = *count as f64 / stats.total as f64;
            if confidence < min_confidence {
                return None;
            }
            Some(CategorySuggestion {
                rationale: format!(
                    "{count} of {} clicks came from {top} queries",
                    stats.total
                ),
                suggested_category: top.clone(),
                current_category: stats.current,
                confidence,
                supporting_clicks: *count,
                document_id,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.supporting_clicks.cmp(&a.supporting_clicks))
            .then_with(|| a.document_id.cmp(&b.document_id))
    });
    suggestions.truncate(max);
    suggestions
}
