//! Batch analytics over an interaction log snapshot.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};

use cairn_core::models::{
    InteractionType, LearningAnalytics, LearningEvent, RoutingPath, ShownResponse,
};

use crate::log::LogEntry;

/// Analytics over `entries`, counting only events at or after `since`.
///
/// Interactions are joined to responses by query id; a click on a document
/// that was not in the shown response still counts toward CTR but not
/// toward average click rank.
pub fn compute(entries: &[LogEntry], since: Option<DateTime<Utc>>) -> LearningAnalytics {
    let in_window = |ts: DateTime<Utc>| since.map_or(true, |s| ts >= s);

    let responses: HashMap<&str, &ShownResponse> = entries
        .iter()
        .filter_map(|e| match &e.event {
            LearningEvent::ResponseShown(r) => Some((r.query_id.as_str(), r)),
            LearningEvent::Interaction(_) => None,
        })
        .collect();

    let mut analytics = LearningAnalytics {
        processed_sequence: entries.last().map_or(0, |e| e.sequence),
        ..Default::default()
    };

    let mut clicked_queries: HashSet<&str> = HashSet::new();
    let mut click_ranks: Vec<usize> = Vec::new();

    for entry in entries {
        let ts = entry.event.timestamp();
        if !in_window(ts) {
            continue;
        }
        analytics.window_start = Some(analytics.window_start.map_or(ts, |w| w.min(ts)));
        analytics.window_end = Some(analytics.window_end.map_or(ts, |w| w.max(ts)));

        match &entry.event {
            LearningEvent::ResponseShown(r) => {
                analytics.total_responses += 1;
                *analytics.routing_distribution.entry(r.routing_path).or_default() += 1;
                *analytics.complexity_distribution.entry(r.complexity).or_default() += 1;
            }
            LearningEvent::Interaction(i) => {
                analytics.total_interactions += 1;
                *analytics.interaction_counts.entry(i.interaction_type).or_default() += 1;
                if i.interaction_type != InteractionType::Click {
                    continue;
                }
                let Some(response) = responses.get(i.query_id.as_str()) else {
                    continue;
                };
                if in_window(response.timestamp) {
                    clicked_queries.insert(response.query_id.as_str());
                }
                let rank = i.document_id.as_deref().and_then(|doc| {
                    response
                        .results
                        .iter()
                        .find(|r| r.document_id == doc)
                        .map(|r| r.rank)
                });
                if let Some(rank) = rank {
                    click_ranks.push(rank);
                }
            }
        }
    }

    if analytics.total_responses > 0 {
        analytics.click_through_rate =
            clicked_queries.len() as f64 / analytics.total_responses as f64;
    }
    if !click_ranks.is_empty() {
        analytics.average_click_rank =
            Some(click_ranks.iter().sum::<usize>() as f64 / click_ranks.len() as f64);
    }

    let mut shown_per_path: BTreeMap<RoutingPath, usize> = BTreeMap::new();
    let mut clicked_per_path: BTreeMap<RoutingPath, usize> = BTreeMap::new();
    for response in responses.values().filter(|r| in_window(r.timestamp)) {
        *shown_per_path.entry(response.routing_path).or_default() += 1;
        if clicked_queries.contains(response.query_id.as_str()) {
            *clicked_per_path.entry(response.routing_path).or_default() += 1;
        }
    }
    analytics.per_path_ctr = shown_per_path
        .into_iter()
        .map(|(path, shown)| {
            let clicked = clicked_per_path.get(&path).copied().unwrap_or(0);
            (path, clicked as f64 / shown as f64)
        })
        .collect();

    analytics
}
