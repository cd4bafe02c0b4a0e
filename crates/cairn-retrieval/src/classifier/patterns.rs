//! Deterministic query patterns.

use std::sync::LazyLock;

use regex::Regex;

/// Relationship / lineage language.
pub static RELATIONSHIP: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(depends? on|dependen(cy|cies|ts?)|flows? (into|from|to)|feeds?|feeding|who (reads|writes|uses|calls|references)|reads? from|writes? to|downstream|upstream|lineage|impact of|used by|referenced by|references|called by|calls)\b",
    )
    .ok()
});

/// Dotted identifiers: `table.column`, `schema.table.column`, `db.schema.table.column`.
pub static QUALIFIED_NAME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]+(?:\.[A-Za-z_][A-Za-z0-9_]+){1,3}\b").ok()
});

/// Double-quoted literals, or single-quoted ones that start a word.
pub static QUOTED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#""([^"]+)"|(?:^|\s)'([^']+)'"#).ok());

/// `in database X`, `from the X database`, `db X`.
pub static DATABASE_FILTER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:in|from|within)\s+(?:the\s+)?(?:database|db)\s+([A-Za-z_][A-Za-z0-9_]*)|\b([A-Za-z_][A-Za-z0-9_]*)\s+(?:database|db)\b",
    )
    .ok()
});

/// `category X` / `X category`.
pub static CATEGORY_FILTER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcategory\s+([A-Za-z_][A-Za-z0-9_]*)|\b([A-Za-z_][A-Za-z0-9_]*)\s+category\b")
        .ok()
});

/// True when `regex` compiled and matches `text`.
pub fn is_match(regex: &LazyLock<Option<Regex>>, text: &str) -> bool {
    regex.as_ref().is_some_and(|re| re.is_match(text))
}

/// Every match of `regex` in `text` (whole match), in order.
pub fn find_all(regex: &LazyLock<Option<Regex>>, text: &str) -> Vec<String> {
    match regex.as_ref() {
        Some(re) => re.find_iter(text).map(|m| m.as_str().to_string()).collect(),
        None => Vec::new(),
    }
}

/// First non-empty capture group of every match, in order.
pub fn captures_all(regex: &LazyLock<Option<Regex>>, text: &str) -> Vec<String> {
    let Some(re) = regex.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(text)
        .filter_map(|caps| {
            caps.iter()
                .skip(1)
                .flatten()
                .next()
                .map(|m| m.as_str().trim().to_string())
        })
        .filter(|s| !s.is_empty())
        .collect()
}
