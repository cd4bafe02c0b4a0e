//! Post-retrieval filters from the caller's search options.
//!
//! Applied to every path list before reranking and fusion. A candidate with
//! no value for a filtered field never matches.

use cairn_core::models::{CandidateResult, SearchOptions};

fn matches(accepted: &[String], value: Option<&str>) -> bool {
    accepted.is_empty()
        || value.is_some_and(|v| accepted.iter().any(|a| a.trim().eq_ignore_ascii_case(v)))
}

/// Whether `candidate` passes every filter set in `options`.
pub fn passes(options: &SearchOptions, candidate: &CandidateResult) -> bool {
    matches(&options.filter_databases, candidate.database.as_deref())
        && matches(&options.filter_object_types, Some(candidate.object_type.as_str()))
        && matches(&options.filter_categories, candidate.category.as_deref())
}

/// Drop candidates that fail the filters. Returns how many were removed.
pub fn apply(options: &SearchOptions, candidates: &mut Vec<CandidateResult>) -> usize {
    if !options.has_filters() {
        return 0;
    }
    let before = candidates.len();
    candidates.retain(|c| passes(options, c));
    before - candidates.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::models::PathDetail;

    fn candidate(id: &str, object_type: &str, database: Option<&str>, category: Option<&str>) -> CandidateResult {
        CandidateResult {
            document_id: id.into(),
            object_type: object_type.into(),
            name: id.into(),
            score: 1.0,
            detail: PathDetail::Keyword { matched_terms: vec![] },
            text: String::new(),
            database: database.map(str::to_string),
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn no_filters_keeps_everything() {
        let mut list = vec![candidate("a", "table", None, None)];
        assert_eq!(apply(&SearchOptions::default(), &mut list), 0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn filters_are_case_insensitive_and_conjunctive() {
        let options = SearchOptions {
            filter_databases: vec!["Finance".into()],
            filter_object_types: vec!["table".into()],
            ..Default::default()
        };
        let mut list = vec![
            candidate("a", "table", Some("finance"), None),
            candidate("b", "column", Some("finance"), None),
            candidate("c", "table", Some("shop"), None),
            candidate("d", "table", None, None),
        ];
        assert_eq!(apply(&options, &mut list), 3);
        assert_eq!(list[0].document_id, "a");
    }

    #[test]
    fn missing_category_fails_category_filter() {
        let options = SearchOptions {
            filter_categories: vec!["payments".into()],
            ..Default::default()
        };
        assert!(!passes(&options, &candidate("a", "table", Some("x"), None)));
        assert!(passes(&options, &candidate("b", "table", Some("x"), Some("Payments"))));
    }
}
