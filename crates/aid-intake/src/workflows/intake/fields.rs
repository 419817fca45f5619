use serde::{Deserialize, Serialize};

/// Keys used by the workflow engine for the outer shape of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionLayout {
    pub forms_key: String,
    pub form_name_key: String,
    pub elements_key: String,
    pub process_id_key: String,
}

impl Default for SubmissionLayout {
    fn default() -> Self {
        Self {
            forms_key: "blanketter".to_string(),
            form_name_key: "blanketnavn".to_string(),
            elements_key: "elementer".to_string(),
            process_id_key: "publicId".to_string(),
        }
    }
}

/// Form and element identifiers of the body-worn aids application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeFields {
    pub application_form: String,
    pub personal_form: String,
    pub on_behalf_choice: String,
    pub applicant_via_other_party: String,
    pub applicant_self: String,
    pub cpr_key: String,
    pub reapplication_element: String,
    pub reapplication_key: String,
    pub aid_type_element: String,
    pub aid_type_key: String,
    pub remarks_group: String,
    pub remarks_upload_field: String,
    pub documentation_group: String,
    /// Upload field inside the documentation group. Older form revisions used `UploadBilag`.
    pub documentation_upload_field: String,
}

impl Default for IntakeFields {
    fn default() -> Self {
        Self {
            application_form: "Kropsbårne hjælpemidler - samlet ansøgning V3 - Værdiliste"
                .to_string(),
            personal_form: "Kropsbårne hjælpemidler - Personoplysninger V2".to_string(),
            on_behalf_choice: "PaaVegneAfValg".to_string(),
            applicant_via_other_party: "PersonoplysningerAnsoegerVedAndenPart".to_string(),
            applicant_self: "PersonoplysningerAnsoegerSelv".to_string(),
            cpr_key: "CprNummer".to_string(),
            reapplication_element: "HarDuTidligereSoegt".to_string(),
            reapplication_key: "YesSelected".to_string(),
            aid_type_element: "ElementVaerdilisteTypeHjaelpemiddel".to_string(),
            aid_type_key: "Valgtetekst".to_string(),
            remarks_group: "BemærkningerOgVedhaeftFiler".to_string(),
            remarks_upload_field: "UploadBilag".to_string(),
            documentation_group: "Dokumentation".to_string(),
            documentation_upload_field: "UploadDokumentationVaerge".to_string(),
        }
    }
}

impl IntakeFields {
    pub(crate) fn is_applicant_choice(&self, identifier: &str) -> bool {
        identifier == self.applicant_via_other_party || identifier == self.applicant_self
    }
}
