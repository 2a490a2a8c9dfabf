//! Small pure text helpers.

/// Truncate a string to at most `max` characters, ending in `...` when cut.
///
/// - Trims surrounding whitespace before truncating.
/// - Uses `char` count (not bytes) to avoid splitting Unicode scalar values.
/// - Enforces a minimum `max` of 3 so the ellipsis fits.
#[must_use]
pub fn truncate_with_ellipsis(raw: &str, max: usize) -> String {
    let max = max.max(3);
    let trimmed = raw.trim();
    if trimmed.chars().count() <= max {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(max - 3).collect();
    format!("{}...", head.trim_end())
}

/// Collapse runs of whitespace (including newlines) into single spaces.
#[must_use]
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
