//! Tag handling for leads: a per-org company tag is normalized to a
//! canonical lowercase form and stored on each lead as a JSON-encoded
//! string array (NULL meaning "no tags").

/// Lowercase and trim only. No hyphenation: "AC Guys " -> "ac guys".
pub fn normalize_company_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Parse the stored tag column. Fails soft: NULL, malformed JSON or a
/// non-array value all come back as an empty list.
pub fn parse_tags(stored: Option<&str>) -> Vec<String> {
    let Some(raw) = stored else {
        return Vec::new();
    };

    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect(),
        _ => Vec::new(),
    }
}

/// Serialize for storage. An empty list maps to `None` so "no tags" is
/// distinguishable from a stored empty array.
pub fn serialize_tags(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    serde_json::to_string(tags).ok()
}

/// Append the normalized tag if it is not already present.
pub fn add_tag(existing: &[String], new_tag: &str) -> Vec<String> {
    let normalized = normalize_company_tag(new_tag);
    if existing.iter().any(|t| *t == normalized) {
        return existing.to_vec();
    }

    let mut tags = existing.to_vec();
    tags.push(normalized);
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_company_tag("  AC Guys  ");
        assert_eq!(once, "ac guys");
        assert_eq!(normalize_company_tag(&once), once);
    }

    #[test]
    fn test_normalize_keeps_spaces() {
        // Lowercase + trim only; spaces are not hyphenated
        assert_eq!(normalize_company_tag("Joe's Plumbing Co"), "joe's plumbing co");
    }

    #[test]
    fn test_parse_null_and_malformed() {
        assert_eq!(parse_tags(None), Vec::<String>::new());
        assert_eq!(parse_tags(Some("not json")), Vec::<String>::new());
        assert_eq!(parse_tags(Some("{\"a\": 1}")), Vec::<String>::new());
    }

    #[test]
    fn test_serialize_empty_is_none() {
        assert_eq!(serialize_tags(&[]), None);
    }

    #[test]
    fn test_round_trip() {
        let tags = vec!["ac guys".to_string(), "hvac".to_string()];
        let stored = serialize_tags(&tags).unwrap();
        assert_eq!(parse_tags(Some(&stored)), tags);

        // Round trip through the empty case is lossy by design:
        // [] -> NULL -> []
        assert_eq!(parse_tags(serialize_tags(&[]).as_deref()), Vec::<String>::new());
    }

    #[test]
    fn test_add_tag_deduplicates() {
        let tags = vec!["ac guys".to_string()];
        assert_eq!(add_tag(&tags, "  AC Guys "), tags);
        assert_eq!(
            add_tag(&tags, "hvac"),
            vec!["ac guys".to_string(), "hvac".to_string()]
        );
    }
}
