//! Keyword scope gate for incoming questions.

/// Terms that mark a question as being about provider pricing or quality.
///
/// Matched as substrings of the lower-cased question, so `"provider"` also
/// covers `"providers"` and `"price"` covers `"prices"`.
pub const SCOPE_TERMS: &[&str] = &[
    "hospital", "pricing", "price", "cost", "charge", "payment", "rating", "rated", "provider",
    "quality", "cheapest", "lowest",
];

/// Returns true if the question mentions at least one scope term.
///
/// Deliberately strict: a legitimate question phrased without any of the
/// terms is refused rather than sent to the model.
pub fn is_in_scope(question: &str) -> bool {
    let lowered = question.to_lowercase();
    SCOPE_TERMS.iter().any(|term| lowered.contains(term))
}
