use serde::de::DeserializeOwned;

/// Remove Markdown code fences (```` ``` ```` / ```` ```json ````) around model output.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches("json"),
    };
    body.trim_end().trim_end_matches("```").trim()
}

/// Parse model output as `T`, tolerating code fences and prose around one JSON object.
///
/// Tries the fence-stripped text first, then the slice between the first `{`
/// and the last `}`. Returns `None` when neither parses.
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let cleaned = strip_code_fences(raw);
    if let Ok(value) = serde_json::from_str(cleaned) {
        return Some(value);
    }

    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&cleaned[start..=end]).ok()
}
