use serde_json::Value;

/// Decides whether a submission value carries information.
///
/// `null`, empty mappings, empty sequences and blank strings are absent. Everything
/// else is present, including `0` and `false`.
pub fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Renders a scalar as text when it is present. Mappings, sequences and booleans
/// are not references and yield `None`.
pub(crate) fn present_text(value: &Value) -> Option<String> {
    if !is_non_empty(value) {
        return None;
    }

    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
