use super::attachments::harvest_attachment_ids;
use super::emptiness::present_text;
use super::extractor::{find_element, flatten_submission, Referable};
use super::fields::{IntakeFields, SubmissionLayout};
use super::lookup::{ElementValueLookup, RawSubmissionLookup};
use super::ExtractionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Facts extracted from one submission, handed to case creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessFact {
    pub applicant_id: Option<String>,
    pub is_reapplication: bool,
    pub aid_type: String,
    pub attachment_ids: Vec<String>,
    pub process_id: String,
}

/// Builds [`BusinessFact`]s from raw submissions.
#[derive(Debug, Clone)]
pub struct FactAssembler<L = RawSubmissionLookup> {
    fields: IntakeFields,
    layout: SubmissionLayout,
    lookup: L,
}

impl FactAssembler<RawSubmissionLookup> {
    pub fn new(fields: IntakeFields, layout: SubmissionLayout) -> Self {
        Self::with_lookup(fields, layout, RawSubmissionLookup)
    }
}

impl Default for FactAssembler<RawSubmissionLookup> {
    fn default() -> Self {
        Self::new(IntakeFields::default(), SubmissionLayout::default())
    }
}

impl<L: ElementValueLookup> FactAssembler<L> {
    pub fn with_lookup(fields: IntakeFields, layout: SubmissionLayout, lookup: L) -> Self {
        Self {
            fields,
            layout,
            lookup,
        }
    }

    pub fn fields(&self) -> &IntakeFields {
        &self.fields
    }

    pub fn layout(&self) -> &SubmissionLayout {
        &self.layout
    }

    /// Returns `None` when the submission is not yet complete or well formed. The cause is
    /// logged and the caller is expected to skip the submission.
    pub fn assemble(&self, submission: &Value) -> Option<BusinessFact> {
        match self.try_assemble(submission) {
            Ok(fact) => Some(fact),
            Err(error) => {
                let process_id = submission
                    .get(&self.layout.process_id_key)
                    .and_then(present_text);
                warn!(
                    process_id = process_id.as_deref().unwrap_or("<unknown>"),
                    %error,
                    "skipping submission: intake facts could not be extracted"
                );
                None
            }
        }
    }

    pub fn try_assemble(&self, submission: &Value) -> Result<BusinessFact, ExtractionError> {
        let fields = &self.fields;
        let forms = submission
            .get(&self.layout.forms_key)
            .and_then(Value::as_array)
            .ok_or_else(|| ExtractionError::MissingSubForms {
                key: self.layout.forms_key.clone(),
            })?;

        let application = self.sub_form(forms, &fields.application_form)?;
        let personal = self.sub_form(forms, &fields.personal_form)?;

        let application_entries = flatten_submission(application, &self.layout.elements_key)?;
        let personal_entries = flatten_submission(personal, &self.layout.elements_key)?;

        let process_id = submission
            .get(&self.layout.process_id_key)
            .and_then(present_text)
            .ok_or_else(|| ExtractionError::MissingProcessId {
                key: self.layout.process_id_key.clone(),
            })?;

        let applicant_id = self.applicant_id(&personal_entries);
        if applicant_id.is_none() {
            debug!(%process_id, "applicant could not be identified from the submission");
        }

        let mut attachment_ids = Vec::new();
        harvest_from_group(
            &application_entries,
            &fields.remarks_group,
            &fields.remarks_upload_field,
            &mut attachment_ids,
        );
        harvest_from_group(
            &personal_entries,
            &fields.documentation_group,
            &fields.documentation_upload_field,
            &mut attachment_ids,
        );

        Ok(BusinessFact {
            applicant_id,
            is_reapplication: self.is_reapplication(&application_entries),
            aid_type: self.aid_type(submission, &process_id),
            attachment_ids,
            process_id,
        })
    }

    fn sub_form<'a>(&self, forms: &'a [Value], name: &str) -> Result<&'a Value, ExtractionError> {
        forms
            .iter()
            .find(|form| {
                form.get(&self.layout.form_name_key).and_then(Value::as_str) == Some(name)
            })
            .ok_or_else(|| ExtractionError::MissingSubForm {
                form_name: name.to_string(),
            })
    }

    fn applicant_id(&self, personal: &[Referable]) -> Option<String> {
        let choice = find_element(personal, &self.fields.on_behalf_choice)?;
        let applicant = choice
            .first_child_scope()
            .iter()
            .filter_map(Referable::as_element)
            .find(|candidate| self.fields.is_applicant_choice(&candidate.identifier))?;

        applicant.value(&self.fields.cpr_key).and_then(present_text)
    }

    fn is_reapplication(&self, application: &[Referable]) -> bool {
        let answer = find_element(application, &self.fields.reapplication_element)
            .and_then(|element| element.value(&self.fields.reapplication_key));

        match answer {
            Some(Value::Bool(selected)) => *selected,
            Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Empty when the submission records no aid type; routing then falls back to the
    /// catch-all rule row.
    fn aid_type(&self, submission: &Value, process_id: &str) -> String {
        let aid_type = self
            .lookup
            .find(
                submission,
                &self.fields.aid_type_element,
                &self.fields.aid_type_key,
            )
            .as_ref()
            .and_then(present_text);

        aid_type.unwrap_or_else(|| {
            warn!(
                %process_id,
                element = %self.fields.aid_type_element,
                value = %self.fields.aid_type_key,
                "submission records no aid type"
            );
            String::new()
        })
    }
}

fn harvest_from_group(
    entries: &[Referable],
    group_identifier: &str,
    upload_field: &str,
    out: &mut Vec<String>,
) {
    if let Some(group) = find_element(entries, group_identifier) {
        harvest_attachment_ids(group.first_child_scope(), upload_field, out);
    }
}
