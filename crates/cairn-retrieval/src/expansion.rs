//! Catalog-aware synonym expansion.
//!
//! Expands queries with related terms to improve recall, e.g.
//! "pii" → "personal email name card".

use std::collections::HashMap;

/// Maps common catalog abbreviations and terms to related expansions.
fn synonym_map() -> HashMap<&'static str, &'static [&'static str]> {
    let mut m = HashMap::new();
    m.insert("pii", &["personal", "email", "name", "card"][..]);
    m.insert("card", &["payment", "pan"]);
    m.insert("payment", &["card", "settlement", "transaction"]);
    m.insert("customer", &["client", "contact"]);
    m.insert("client", &["customer"]);
    m.insert("email", &["mail", "contact"]);
    m.insert("revenue", &["sales", "amount", "total"]);
    m.insert("order", &["purchase", "sales"]);
    m.insert("sp", &["procedure"]);
    m.insert("proc", &["procedure"]);
    m.insert("tbl", &["table"]);
    m.insert("col", &["column"]);
    m.insert("fk", &["references", "key"]);
    m.insert("udf", &["function"]);
    m.insert("etl", &["feed", "staging", "load"]);
    m
}

/// Expand a query with catalog synonyms.
///
/// Returns the original query with at most five related terms appended.
pub fn expand(query: &str) -> String {
    let map = synonym_map();
    let words: Vec<&str> = query.split_whitespace().collect();
    let mut expansions: Vec<&str> = Vec::new();

    for word in &words {
        let lower = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        let synonyms = map.get(lower.as_str()).or_else(|| map.get(singular));
        if let Some(synonyms) = synonyms {
            for syn in *synonyms {
                if !words.iter().any(|w| w.eq_ignore_ascii_case(syn)) && !expansions.contains(syn)
                {
                    expansions.push(syn);
                }
            }
        }
    }

    if expansions.is_empty() {
        return query.to_string();
    }

    expansions.truncate(5);
    format!("{} {}", query, expansions.join(" "))
}
