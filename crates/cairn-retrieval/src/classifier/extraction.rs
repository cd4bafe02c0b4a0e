//! Entity and filter extraction from raw query text.

use cairn_core::models::{ExtractedFilters, ObjectType};

use super::patterns::{self, CATEGORY_FILTER, DATABASE_FILTER, QUALIFIED_NAME, QUOTED};
use crate::text;

/// Qualified identifiers, quoted literals and capitalized tokens, deduplicated
/// case-insensitively in that order.
pub fn extract_entities(query: &str) -> Vec<String> {
    let mut entities: Vec<String> = Vec::new();
    let mut push = |candidate: String| {
        if !entities.iter().any(|e| e.eq_ignore_ascii_case(&candidate)) {
            entities.push(candidate);
        }
    };

    let qualified = patterns::find_all(&QUALIFIED_NAME, query);
    for name in &qualified {
        push(name.clone());
    }
    for literal in patterns::captures_all(&QUOTED, query) {
        push(literal);
    }
    for (i, word) in query
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
        .map(|w| w.trim_matches('.'))
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        // Already captured as part of a dotted identifier.
        if word.contains('.') || qualified.iter().any(|q| q.contains(word)) {
            continue;
        }
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);
        // Sentence-initial capitals only count when the word has inner capitals too.
        let camel = word.chars().skip(1).any(char::is_uppercase);
        if capitalized && (i > 0 || camel) && !text::is_stopword(word) {
            push(word.to_string());
        }
    }
    entities
}

pub fn extract_filters(query: &str) -> ExtractedFilters {
    let mut object_types: Vec<String> = Vec::new();
    for word in query.split(|c: char| !c.is_alphanumeric()) {
        if let Some(object_type) = ObjectType::from_str_name(word) {
            let name = object_type.as_str().to_string();
            if !object_types.contains(&name) {
                object_types.push(name);
            }
        }
    }

    ExtractedFilters {
        databases: dedup(patterns::captures_all(&DATABASE_FILTER, query)),
        object_types,
        categories: dedup(patterns::captures_all(&CATEGORY_FILTER, query)),
        qualified_names: dedup(patterns::find_all(&QUALIFIED_NAME, query)),
    }
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|v| v.eq_ignore_ascii_case(&value)) {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_from_identifiers_quotes_and_capitals() {
        let entities = extract_entities(r#"what flows into PaymentsTable.CardNumber from "card feed" via Staging"#);
        assert_eq!(
            entities,
            vec![
                "PaymentsTable.CardNumber".to_string(),
                "card feed".to_string(),
                "Staging".to_string()
            ]
        );
    }

    #[test]
    fn sentence_initial_capital_is_not_an_entity() {
        assert!(extract_entities("Show me customer emails").is_empty());
        assert_eq!(extract_entities("PaymentsTable columns"), vec!["PaymentsTable"]);
    }

    #[test]
    fn filters_pick_up_types_and_databases() {
        let filters = extract_filters("list tables and views in database finance");
        assert_eq!(filters.object_types, vec!["table", "view"]);
        assert_eq!(filters.databases, vec!["finance"]);
        assert!(filters.qualified_names.is_empty());
    }
}
