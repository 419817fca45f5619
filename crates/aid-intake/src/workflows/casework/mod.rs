//! Texts and workflow payloads derived from an extracted case.

mod payloads;
mod texts;

pub use payloads::{FormValue, ProcessSearchQuery, ProcessUpdate};
pub use texts::CaseTexts;
