use super::emptiness::present_text;
use super::extractor::{find_element, Referable};

const DOCUMENT_KEY_PREFIX: &str = "document";

/// Appends the attachment references held by the upload field `field_identifier`.
///
/// Only keys prefixed with `document` are considered, in the order the submission lists
/// them. A missing field is not an error.
pub fn harvest_attachment_ids(entries: &[Referable], field_identifier: &str, out: &mut Vec<String>) {
    let Some(field) = find_element(entries, field_identifier) else {
        return;
    };

    let before = out.len();
    out.extend(
        field
            .values
            .iter()
            .filter(|(key, _)| key.starts_with(DOCUMENT_KEY_PREFIX))
            .filter_map(|(_, value)| present_text(value)),
    );

    tracing::debug!(
        field = field_identifier,
        harvested = out.len() - before,
        "harvested attachment references"
    );
}
