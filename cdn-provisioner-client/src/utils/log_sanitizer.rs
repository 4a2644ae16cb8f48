//! Log sanitization utilities
//!
//! Request and response bodies are logged at debug level. GTM domains carry
//! client TLS private keys, so those values are masked before truncation.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// JSON keys whose string values must never reach the log.
const SECRET_KEYS: &[&str] = &["defaultSslClientPrivateKey"];

const MASK: &str = "***";

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit, otherwise the first
/// `TRUNCATE_LIMIT` bytes (on a char boundary) and the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Replace the string value of every secret key in a JSON text with a mask.
///
/// Works on raw text so it also covers bodies that fail to parse.
pub fn mask_secrets(s: &str) -> String {
    let mut out = s.to_string();
    for key in SECRET_KEYS {
        let needle = format!("\"{key}\"");
        let mut search_from = 0;
        while let Some(pos) = out[search_from..].find(&needle) {
            let after_key = search_from + pos + needle.len();
            let Some(value_start) = string_value_start(&out, after_key) else {
                search_from = after_key;
                continue;
            };
            let Some(value_end) = string_value_end(&out, value_start) else {
                break;
            };
            out.replace_range(value_start..value_end, MASK);
            search_from = value_start + MASK.len();
        }
    }
    out
}

/// Sanitize a body for logging: mask secrets, then truncate.
pub fn sanitize_body(s: &str) -> String {
    truncate_for_log(&mask_secrets(s))
}

/// Byte index just after the opening quote of the value following `"key"`.
fn string_value_start(s: &str, after_key: usize) -> Option<usize> {
    let rest = &s[after_key..];
    let colon = rest.find(|c: char| !c.is_whitespace())?;
    if !rest[colon..].starts_with(':') {
        return None;
    }
    let after_colon = &rest[colon + 1..];
    let quote = after_colon.find(|c: char| !c.is_whitespace())?;
    if !after_colon[quote..].starts_with('"') {
        return None;
    }
    Some(after_key + colon + 1 + quote + 1)
}

/// Byte index of the closing quote of a JSON string starting at `start`.
fn string_value_end(s: &str, start: usize) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s[start..].char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Some(start + i),
            _ => escaped = false,
        }
    }
    None
}
