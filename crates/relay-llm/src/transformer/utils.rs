/// Transformer utilities
use relay_core::Usage;
use serde_json::Value;

/// Safe get from JSON value by dotted path; numeric segments index arrays
pub fn safe_get<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;

    for part in path.split('.') {
        current = match part.parse::<usize>() {
            Ok(index) if current.is_array() => current.get(index)?,
            _ => current.get(part)?,
        };
    }

    Some(current)
}

/// Safe get string from JSON
pub fn safe_get_str<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    safe_get(value, path)?.as_str()
}

/// Safe get unsigned integer from JSON
pub fn safe_get_u64(value: &Value, path: &str) -> Option<u64> {
    safe_get(value, path)?.as_u64()
}

/// Build usage counters from token counts at the given paths, zero when absent
pub fn usage_at(value: &Value, input_path: &str, output_path: &str) -> Usage {
    Usage::from_tokens(
        safe_get_u64(value, input_path).unwrap_or(0),
        safe_get_u64(value, output_path).unwrap_or(0),
    )
}

/// Shorten a payload for log output
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
