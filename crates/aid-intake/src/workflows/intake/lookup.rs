use super::emptiness::is_non_empty;
use serde_json::Value;

/// Direct query against a raw submission by element and value identifier.
///
/// Used for fields whose value the workflow engine indexes itself rather than through the
/// flattened element tree.
pub trait ElementValueLookup {
    fn find(&self, submission: &Value, element_identifier: &str, value_identifier: &str)
        -> Option<Value>;
}

/// Depth-first search of the raw document, in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawSubmissionLookup;

impl ElementValueLookup for RawSubmissionLookup {
    fn find(
        &self,
        submission: &Value,
        element_identifier: &str,
        value_identifier: &str,
    ) -> Option<Value> {
        search(submission, element_identifier, value_identifier).cloned()
    }
}

fn search<'a>(node: &'a Value, element_identifier: &str, value_identifier: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => {
            let matches_identifier = map
                .get("identifier")
                .and_then(Value::as_str)
                .is_some_and(|identifier| identifier == element_identifier);

            if matches_identifier {
                let found = map
                    .get("values")
                    .and_then(|values| values.get(value_identifier))
                    .filter(|value| is_non_empty(value));
                if found.is_some() {
                    return found;
                }
            }

            map.values()
                .find_map(|nested| search(nested, element_identifier, value_identifier))
        }
        Value::Array(items) => items
            .iter()
            .find_map(|item| search(item, element_identifier, value_identifier)),
        _ => None,
    }
}
