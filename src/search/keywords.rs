//! Query tokenization for keyword matching.

/// Filler words that would match nearly every record.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "for", "from", "in", "is", "of", "on", "or", "the", "to",
    "with",
];

/// Lowercased terms of a query, split on whitespace and `+`.
///
/// Stop words are dropped unless they are the only thing in the query.
pub fn keyword_terms(query: &str) -> Vec<String> {
    let all: Vec<String> = query
        .split(|c: char| c.is_whitespace() || c == '+')
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect();

    let meaningful: Vec<String> = all
        .iter()
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .cloned()
        .collect();

    if meaningful.is_empty() { all } else { meaningful }
}

/// True when `needle` is empty or appears in `haystack`, ignoring case.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}
