//! Lightweight autocomplete over catalog object names and recently served
//! queries. Never fans out to retrieval.

use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use cairn_graph::CatalogGraph;

#[derive(Debug, Clone, Copy)]
struct RecentEntry {
    count: u64,
    last_seen: u64,
}

/// Bounded frequency table of normalized queries.
pub struct RecentQueries {
    entries: DashMap<String, RecentEntry>,
    capacity: usize,
    clock: AtomicU64,
}

impl RecentQueries {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
            clock: AtomicU64::new(0),
        }
    }

    /// Count one more use of `normalized`. Past capacity, the least recently
    /// seen query is forgotten.
    pub fn record(&self, normalized: &str) {
        if normalized.is_empty() {
            return;
        }
        let now = self.clock.fetch_add(1, Ordering::Relaxed) + 1;
        self.entries
            .entry(normalized.to_string())
            .and_modify(|e| {
                e.count += 1;
                e.last_seen = now;
            })
            .or_insert(RecentEntry {
                count: 1,
                last_seen: now,
            });

        if self.entries.len() > self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|e| e.value().last_seen)
                .map(|e| e.key().clone());
            if let Some(key) = oldest {
                self.entries.remove(&key);
            }
        }
    }

    pub fn count(&self, normalized: &str) -> u64 {
        self.entries.get(normalized).map_or(0, |e| e.count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn snapshot(&self) -> Vec<(String, u64)> {
        self.entries
            .iter()
            .map(|e| (e.key().clone(), e.value().count))
            .collect()
    }
}

/// Prefix matches before substring matches; within each, frequent recent
/// queries first, then shorter, then alphabetical. Case-insensitive and
/// without duplicates.
pub fn suggest(
    graph: &CatalogGraph,
    recent: &RecentQueries,
    partial: &str,
    max: usize,
) -> Vec<String> {
    let needle = partial.trim().to_lowercase();
    if needle.is_empty() || max == 0 {
        return Vec::new();
    }

    // (tier, popularity, text)
    let mut scored: Vec<(u8, u64, String)> = Vec::new();
    let mut consider = |text: &str, popularity: u64| {
        let lower = text.to_lowercase();
        let tier = if lower.starts_with(&needle) {
            0
        } else if lower.contains(&needle) {
            1
        } else {
            return;
        };
        scored.push((tier, popularity, text.to_string()));
    };

    for (query, count) in recent.snapshot() {
        consider(&query, count);
    }
    for object in graph.objects() {
        consider(&object.name, 0);
    }

    scored.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| Reverse(a.1).cmp(&Reverse(b.1)))
            .then_with(|| a.2.len().cmp(&b.2.len()))
            .then_with(|| a.2.cmp(&b.2))
    });

    let mut seen = HashSet::new();
    scored
        .into_iter()
        .filter(|(_, _, text)| seen.insert(text.to_lowercase()))
        .map(|(_, _, text)| text)
        .take(max)
        .collect()
}
