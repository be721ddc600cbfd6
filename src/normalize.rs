//! Input normalization shared by every matcher.

/// Lower-case the input and collapse runs of whitespace into single spaces.
///
/// ```
/// assert_eq!(tripdesk::normalize("  Add   SNORKELING\tplease "), "add snorkeling please");
/// ```
pub fn normalize(input: &str) -> String {
    input
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when `haystack` (already normalized) contains any of `needles`.
pub(crate) fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

/// True when `haystack` (already normalized) contains all of `needles`.
pub(crate) fn contains_all(haystack: &str, needles: &[String]) -> bool {
    needles.iter().all(|n| haystack.contains(n.as_str()))
}
