//! Redaction for provider error bodies before they reach logs or error chains.

use crate::error::LlmError;
use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Prefixes that start a credential token; the token itself is redacted.
const TOKEN_PREFIXES: &[&str] = &[
    "sk-ant-", "sk-or-", "sk-", "ghp_", "github_pat_", "hf_", "xoxb-", "xoxp-", "AKIA", "ASIA",
    "AIza", "ya29.", "eyJ",
];

/// Markers followed by a credential value; the marker stays, the value goes.
const VALUE_MARKERS: &[&str] = &[
    "Bearer ",
    "bearer ",
    "x-api-key: ",
    "api_key=",
    "access_token=",
    "\"api_key\":\"",
    "\"access_token\":\"",
    "\"token\":\"",
    "\"secret\":\"",
    "\"password\":\"",
];

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

fn token_len(rest: &str) -> usize {
    rest.char_indices()
        .find(|&(_, c)| !is_token_char(c))
        .map_or(rest.len(), |(i, _)| i)
}

/// Replace `pattern` and/or the token after it. `keep_marker` keeps the pattern text.
fn redact_after(input: &mut String, pattern: &str, keep_marker: bool) {
    let mut from = 0;
    while let Some(rel) = input[from..].find(pattern) {
        let start = from + rel;
        let value_start = start + pattern.len();
        let value_len = token_len(&input[value_start..]);
        if value_len == 0 {
            from = value_start;
            continue;
        }
        let replace_from = if keep_marker { value_start } else { start };
        input.replace_range(replace_from..value_start + value_len, REDACTED);
        from = replace_from + REDACTED.len();
    }
}

/// Redact credential-looking substrings from provider output.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let hit = TOKEN_PREFIXES.iter().any(|p| input.contains(p))
        || VALUE_MARKERS.iter().any(|m| input.contains(m));
    if !hit {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in VALUE_MARKERS {
        redact_after(&mut scrubbed, marker, true);
    }
    for prefix in TOKEN_PREFIXES {
        redact_after(&mut scrubbed, prefix, false);
    }
    Cow::Owned(scrubbed)
}

/// Scrub secrets, then truncate to a fixed number of characters.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);
    match scrubbed.char_indices().nth(MAX_API_ERROR_CHARS) {
        None => scrubbed.into_owned(),
        Some((cut, _)) => format!("{}...", &scrubbed[..cut]),
    }
}

/// Turn a non-2xx provider response into a typed, sanitized error.
pub async fn api_error(provider: &str, response: reqwest::Response) -> LlmError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
    let sanitized = sanitize_api_error(&body);

    tracing::warn!(provider, status = status.as_u16(), body = %sanitized, "llm.api_error");

    match status.as_u16() {
        401 | 403 => LlmError::Auth {
            provider: provider.to_string(),
        },
        429 => LlmError::RateLimited {
            provider: provider.to_string(),
        },
        _ => LlmError::Request {
            provider: provider.to_string(),
            message: format!("HTTP {status}: {sanitized}"),
        },
    }
}

/// Transport-level failure (connect, timeout, TLS).
pub fn transport_error(provider: &str, err: &reqwest::Error) -> LlmError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "transport error"
    };
    LlmError::Request {
        provider: provider.to_string(),
        message: kind.to_string(),
    }
}
