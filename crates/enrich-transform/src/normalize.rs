//! Race identifier normalization.

/// Normalizes a race identifier to `<lowercase prefix><rest>`.
///
/// Whitespace runs are collapsed and the identifier is split into tokens.
/// The first token is lowercased; the remaining tokens are appended as-is,
/// without separators. A single token is simply lowercased.
///
/// ```
/// use enrich_transform::normalize_race_id;
///
/// assert_eq!(normalize_race_id("Cup 25"), "cup25");
/// assert_eq!(normalize_race_id("LEAGUE 4"), "league4");
/// assert_eq!(normalize_race_id("cup25"), "cup25");
/// ```
pub fn normalize_race_id(race_id: &str) -> String {
    let mut tokens = race_id.split_whitespace();
    let Some(first) = tokens.next() else {
        return String::new();
    };
    let mut normalized = first.to_lowercase();
    normalized.extend(tokens);
    normalized
}

/// Optional form: `None` stays `None`.
pub fn normalize_race_id_opt(race_id: Option<&str>) -> Option<String> {
    race_id.map(normalize_race_id)
}
