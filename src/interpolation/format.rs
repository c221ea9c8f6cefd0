//! Stringification of resolved values for splicing into literal text

use serde_json::Value;

/// Render a resolved value as text for a partial (spliced) placeholder.
///
/// Absence and `null` render as the empty string, arrays render their
/// elements recursively joined with `", "`, and records render as compact JSON.
/// Numbers use serde_json's text, so a stored `10.0` renders as `"10.0"`.
pub fn format_value(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(value) => format_present(value),
    }
}

fn format_present(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(format_present)
            .collect::<Vec<_>>()
            .join(", "),
        // Serializing a Value cannot fail: keys are always strings
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
