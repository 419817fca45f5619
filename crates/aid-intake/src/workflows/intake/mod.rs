//! Extraction of intake facts from nested workflow submissions.
//!
//! A submission is a tree of sub-forms whose elements nest arbitrarily. Flattening keeps
//! only elements that carry values, collapsing purely structural wrappers, and the
//! [`FactAssembler`] reads the handful of fields case creation needs from the result.

mod assembler;
mod attachments;
mod emptiness;
mod extractor;
mod fields;
mod lookup;

pub use assembler::{BusinessFact, FactAssembler};
pub use attachments::harvest_attachment_ids;
pub use emptiness::is_non_empty;
pub use extractor::{
    extract_referable, find_element, flatten_submission, FormElement, Referable,
    ReferableElement,
};
pub use fields::{IntakeFields, SubmissionLayout};
pub use lookup::{ElementValueLookup, RawSubmissionLookup};

/// Reasons a submission cannot yet produce a [`BusinessFact`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("submission has no sub-form list under '{key}'")]
    MissingSubForms { key: String },
    #[error("sub-form '{form_name}' not found in submission")]
    MissingSubForm { form_name: String },
    #[error("submission has no process id under '{key}'")]
    MissingProcessId { key: String },
    #[error("form element is malformed: {source}")]
    MalformedElement { source: serde_json::Error },
}
