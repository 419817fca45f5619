use super::emptiness::is_non_empty;
use super::ExtractionError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One node of a sub-form tree as delivered by the workflow engine.
///
/// The engine is loose about valueless nodes: `values` may arrive as `null`, `[]` or a
/// scalar and `identifier` as `null`. Those decode as "no values" and an empty identifier.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FormElement {
    #[serde(default, deserialize_with = "lenient_identifier")]
    pub identifier: String,
    #[serde(default, deserialize_with = "lenient_values")]
    pub values: Option<Map<String, Value>>,
    #[serde(default)]
    pub children: Option<Vec<FormElement>>,
}

impl FormElement {
    fn present_values(&self) -> Option<&Map<String, Value>> {
        self.values.as_ref().filter(|values| !values.is_empty())
    }

    fn children(&self) -> &[FormElement] {
        self.children.as_deref().unwrap_or_default()
    }

    fn shape(&self) -> NodeShape<'_> {
        match self.present_values() {
            Some(values) => NodeShape::Valued(values),
            None if !self.children().is_empty() => NodeShape::Structural,
            None => NodeShape::Empty,
        }
    }
}

fn lenient_identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(identifier) => identifier,
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    })
}

fn lenient_values<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(values) => Ok(Some(values)),
        _ => Ok(None),
    }
}

enum NodeShape<'a> {
    Valued(&'a Map<String, Value>),
    Structural,
    Empty,
}

/// Element that survived flattening because it, or a descendant, carries data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferableElement {
    pub identifier: String,
    pub values: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Referable>,
}

impl ReferableElement {
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|value| is_non_empty(value))
    }

    /// Entries reachable through the first child. A spliced group exposes all of its
    /// members; a single element exposes itself.
    pub fn first_child_scope(&self) -> &[Referable] {
        match self.children.first() {
            Some(Referable::Group(members)) => members,
            Some(single @ Referable::Element(_)) => std::slice::from_ref(single),
            None => &[],
        }
    }
}

/// Output of flattening a subtree.
///
/// A valueless wrapper with several surviving children is spliced into its parent as a
/// `Group`, preserving sibling order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Referable {
    Element(ReferableElement),
    Group(Vec<Referable>),
}

impl Referable {
    pub fn as_element(&self) -> Option<&ReferableElement> {
        match self {
            Referable::Element(element) => Some(element),
            Referable::Group(_) => None,
        }
    }
}

/// Flattens one sub-tree bottom-up, dropping branches that carry no values.
pub fn extract_referable(node: &FormElement) -> Option<Referable> {
    let mut surviving: Vec<Referable> = node
        .children()
        .iter()
        .filter_map(extract_referable)
        .collect();

    match node.shape() {
        NodeShape::Valued(values) => Some(Referable::Element(ReferableElement {
            identifier: node.identifier.clone(),
            values: values.clone(),
            children: surviving,
        })),
        NodeShape::Structural if surviving.len() > 1 => Some(Referable::Group(surviving)),
        NodeShape::Structural => surviving.pop(),
        NodeShape::Empty => None,
    }
}

/// Finds every root element list stored under `elements_key` at any depth of `document`
/// and concatenates their flattened results in document order.
pub fn flatten_submission(
    document: &Value,
    elements_key: &str,
) -> Result<Vec<Referable>, ExtractionError> {
    let mut roots = Vec::new();
    collect_roots(document, elements_key, &mut roots);

    let mut flattened = Vec::new();
    for root in roots {
        let element =
            FormElement::deserialize(root).map_err(|source| ExtractionError::MalformedElement {
                source,
            })?;

        match extract_referable(&element) {
            Some(Referable::Group(members)) => flattened.extend(members),
            Some(single) => flattened.push(single),
            None => {}
        }
    }

    Ok(flattened)
}

fn collect_roots<'a>(value: &'a Value, elements_key: &str, roots: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                match nested {
                    Value::Array(items) if key == elements_key => roots.extend(items),
                    _ => collect_roots(nested, elements_key, roots),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_roots(item, elements_key, roots);
            }
        }
        _ => {}
    }
}

/// First element, skipping spliced groups, whose identifier matches.
pub fn find_element<'a>(entries: &'a [Referable], identifier: &str) -> Option<&'a ReferableElement> {
    entries
        .iter()
        .filter_map(Referable::as_element)
        .find(|element| element.identifier == identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn element(value: Value) -> FormElement {
        serde_json::from_value(value).expect("valid form element")
    }

    fn identifiers(entries: &[Referable]) -> Vec<&str> {
        entries
            .iter()
            .filter_map(Referable::as_element)
            .map(|element| element.identifier.as_str())
            .collect()
    }

    #[test]
    fn valued_leaf_is_kept() {
        let leaf = element(json!({ "identifier": "Navn", "values": { "Tekst": "Jens" } }));
        let result = extract_referable(&leaf).expect("leaf survives");
        let leaf = result.as_element().expect("single element");
        assert_eq!(leaf.identifier, "Navn");
        assert_eq!(leaf.values["Tekst"], json!("Jens"));
        assert!(leaf.children.is_empty());
    }

    #[test]
    fn empty_values_count_as_valueless() {
        let node = element(json!({ "identifier": "Tom", "values": {}, "children": [] }));
        assert!(extract_referable(&node).is_none());

        let missing = element(json!({ "identifier": "Mangler" }));
        assert!(extract_referable(&missing).is_none());
    }

    #[test]
    fn list_or_scalar_values_decode_as_valueless() {
        let listed = element(json!({ "identifier": "Overskrift", "values": [] }));
        assert_eq!(listed.values, None);
        assert!(extract_referable(&listed).is_none());

        let scalar = element(json!({ "identifier": "Tekst", "values": "intro" }));
        assert!(extract_referable(&scalar).is_none());
    }

    #[test]
    fn null_identifier_decodes_as_empty() {
        let wrapper = element(json!({
            "identifier": null,
            "values": [],
            "children": [{ "identifier": 7, "values": { "v": "x" } }]
        }));
        assert_eq!(wrapper.identifier, "");

        let survivor = extract_referable(&wrapper).expect("child survives");
        assert_eq!(survivor.as_element().map(|e| e.identifier.as_str()), Some("7"));
    }

    #[test]
    fn nested_wrappers_unwrap_to_the_single_leaf() {
        let leaf = json!({ "identifier": "Cpr", "values": { "CprNummer": "0101011234" } });
        let wrapped = element(json!({
            "identifier": "Ydre",
            "children": [{ "identifier": "Indre", "values": {}, "children": [leaf.clone()] }]
        }));

        assert_eq!(extract_referable(&wrapped), extract_referable(&element(leaf)));
    }

    #[test]
    fn wrapper_with_several_survivors_becomes_group_in_order() {
        let node = element(json!({
            "identifier": "Gruppe",
            "children": [
                { "identifier": "A", "values": { "v": 1 } },
                { "identifier": "Tom", "values": { } },
                { "identifier": "B", "values": { "v": 0 } },
                { "identifier": "C", "values": { "v": false } }
            ]
        }));

        match extract_referable(&node) {
            Some(Referable::Group(members)) => assert_eq!(identifiers(&members), ["A", "B", "C"]),
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn valued_parent_keeps_valued_descendants_as_children() {
        let node = element(json!({
            "identifier": "PaaVegneAfValg",
            "values": { "Valgt": "Selv" },
            "children": [{
                "identifier": "Wrapper",
                "children": [
                    { "identifier": "PersonoplysningerAnsoegerSelv", "values": { "CprNummer": "1" } },
                    { "identifier": "Adresse", "values": { "Vej": "Torvet 1" } }
                ]
            }]
        }));

        let parent = extract_referable(&node).expect("parent survives");
        let parent = parent.as_element().expect("element");
        assert_eq!(parent.children.len(), 1);
        assert_eq!(
            identifiers(parent.first_child_scope()),
            ["PersonoplysningerAnsoegerSelv", "Adresse"]
        );
    }

    #[test]
    fn input_tree_is_not_mutated() {
        let node = element(json!({
            "identifier": "Rod",
            "children": [{ "identifier": "A", "values": { "v": "x" } }]
        }));
        let before = node.clone();
        let _ = extract_referable(&node);
        assert_eq!(node, before);
    }

    #[test]
    fn flatten_collects_every_occurrence_in_document_order() {
        let document = json!({
            "publicId": "P-1",
            "blanketter": [
                { "blanketnavn": "Første", "elementer": [
                    { "identifier": "A", "values": { "v": 1 } },
                    { "identifier": "Tom", "values": null }
                ]},
                { "blanketnavn": "Anden", "sektion": { "elementer": [
                    { "identifier": "Wrapper", "children": [
                        { "identifier": "B", "values": { "v": 2 } },
                        { "identifier": "C", "values": { "v": 3 } }
                    ]}
                ]}}
            ]
        });

        let flattened = flatten_submission(&document, "elementer").expect("flattens");
        assert_eq!(identifiers(&flattened), ["A", "B", "C"]);
    }

    #[test]
    fn flatten_rejects_malformed_elements() {
        let document = json!({ "elementer": ["not an element"] });
        let error = flatten_submission(&document, "elementer").expect_err("malformed");
        assert!(matches!(error, ExtractionError::MalformedElement { .. }));
    }

    #[test]
    fn find_element_skips_groups() {
        let entries = vec![
            Referable::Group(vec![Referable::Element(ReferableElement {
                identifier: "Skjult".to_string(),
                values: Map::new(),
                children: Vec::new(),
            })]),
            Referable::Element(ReferableElement {
                identifier: "Synlig".to_string(),
                values: Map::new(),
                children: Vec::new(),
            }),
        ];

        assert!(find_element(&entries, "Skjult").is_none());
        assert!(find_element(&entries, "Synlig").is_some());
    }

    #[test]
    fn find_element_does_not_reach_into_nested_groups() {
        let document = json!({
            "elementer": [{
                "identifier": "Ydre",
                "children": [
                    { "identifier": "Indre", "children": [
                        { "identifier": "A", "values": { "v": 1 } },
                        { "identifier": "B", "values": { "v": 2 } }
                    ]},
                    { "identifier": "C", "values": { "v": 3 } }
                ]
            }]
        });

        let flattened = flatten_submission(&document, "elementer").expect("flattens");
        match &flattened[0] {
            Referable::Group(members) => assert_eq!(identifiers(members), ["A", "B"]),
            other => panic!("expected nested group, got {other:?}"),
        }
        assert_eq!(identifiers(&flattened), ["C"]);

        assert!(find_element(&flattened, "A").is_none());
        assert!(find_element(&flattened, "B").is_none());
        assert!(find_element(&flattened, "C").is_some());
    }
}
