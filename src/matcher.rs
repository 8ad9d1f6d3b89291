//! Normalized fuzzy matching of detected entry text against an expected name.

/// Replace full-width parentheses with their half-width equivalents and drop
/// every ordinary (U+0020) and full-width (U+3000) space. All other
/// characters pass through untouched.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '（' => Some('('),
            '）' => Some(')'),
            ' ' | '\u{3000}' => None,
            other => Some(other),
        })
        .collect()
}

/// Normalized sequence similarity in [0, 1]: 1.0 for identical strings, 0.0
/// for disjoint ones. Never fails; an empty side simply scores 0 against
/// anything non-empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    rapidfuzz::fuzz::ratio(a.chars(), b.chars())
}

/// Whether `candidate` is close enough to `expected` after normalization.
/// The comparison is inclusive: a score exactly at `limit` matches.
pub fn is_match(candidate: &str, expected: &str, limit: f64) -> bool {
    similarity(&normalize(candidate), &normalize(expected)) >= limit
}
