/// Canonicalize one raw column label: drop any parenthetical unit suffix
/// (everything from the first `(` onward), trim whitespace, replace the
/// remaining internal spaces with underscores, lowercase.
pub fn normalize_one(raw: &str) -> String {
    let base = match raw.find('(') {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    base.trim().replace(' ', "_").to_lowercase()
}

/// Normalize a full header row, preserving length and order.
pub fn normalize(headers: &[String]) -> Vec<String> {
    headers.iter().map(|h| normalize_one(h)).collect()
}
