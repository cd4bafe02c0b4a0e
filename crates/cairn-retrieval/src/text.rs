//! Query tokenization shared by the classifier and the lexical strategies.

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "all", "any", "by", "does", "do", "every", "for", "from", "how",
    "i", "in", "into", "is", "it", "me", "of", "on", "or", "show", "that", "the", "this", "to",
    "what", "where", "which", "who", "with",
];

/// Lowercase terms split on anything that is not alphanumeric or `_`.
/// Stopwords and duplicates are dropped; first occurrence order is kept.
pub fn terms(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in text.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
        if raw.is_empty() {
            continue;
        }
        let term = raw.to_lowercase();
        if STOPWORDS.contains(&term.as_str()) || out.contains(&term) {
            continue;
        }
        out.push(term);
    }
    out
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word.to_lowercase().as_str())
}
