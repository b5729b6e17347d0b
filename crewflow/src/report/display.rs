//! Humanized display of normalized stage values.

use crate::normalize::DisplayValue;
use serde_json::Value;

/// Turns a snake_case key into title case: `urgency_level` → `Urgency Level`.
#[must_use]
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Renders a JSON value inline: strings bare, lists comma-separated.
fn inline(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(inline).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

/// Returns display lines for a stage value.
///
/// Objects become one `Key: value` line per non-empty field, in document
/// order. Anything else is shown as-is.
#[must_use]
pub fn display_lines(value: &DisplayValue) -> Vec<String> {
    match value.as_object() {
        Some(object) => object
            .iter()
            .filter(|(_, v)| !is_blank(v))
            .map(|(k, v)| format!("{}: {}", humanize_key(k), inline(v)))
            .collect(),
        None => vec![value.to_pretty_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::parse_json_safely;

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("urgency_level"), "Urgency Level");
        assert_eq!(humanize_key("primary_symptoms"), "Primary Symptoms");
        assert_eq!(humanize_key("BODY_parts"), "Body Parts");
        assert_eq!(humanize_key("duration"), "Duration");
        assert_eq!(humanize_key("__x"), "X");
    }

    #[test]
    fn test_display_lines_for_object() {
        let value = parse_json_safely(
            r#"{"urgency_level": "medium", "probable_conditions": ["migraine", "tension headache"], "red_flags": [], "notes": ""}"#,
        );
        assert_eq!(
            display_lines(&value),
            vec![
                "Urgency Level: medium".to_string(),
                "Probable Conditions: migraine, tension headache".to_string(),
            ]
        );
    }

    #[test]
    fn test_display_lines_for_text() {
        let value = parse_json_safely("Patient reports dizziness.");
        assert_eq!(display_lines(&value), vec!["Patient reports dizziness.".to_string()]);
    }
}
