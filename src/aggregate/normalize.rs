//! Title normalization for cross-source deduplication.
//!
//! The normalized form is only ever used as a dedup key; display titles keep
//! whatever spelling the first source supplied.

/// Canonicalize a title into a deduplication key.
///
/// Lower-cases, strips colon and hyphen characters, collapses internal
/// whitespace, and trims. Total function: never fails, empty input yields the
/// empty string, and the result is idempotent under re-normalization.
///
/// Purely structural — no tokenization, no locale awareness, no stemming.
/// Known limitation: `"Se7en"` and `"Seven"` do not match.
pub fn normalize(title: &str) -> String {
    let stripped: String = title
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ':' | '-'))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
