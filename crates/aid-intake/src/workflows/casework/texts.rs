use crate::workflows::intake::BusinessFact;
use chrono::NaiveDate;
use serde::Serialize;

const APPLICATION: &str = "Ansøgning";
const REAPPLICATION: &str = "Genansøgning";
const ATTACHMENTS_SUFFIX: &str = " - Vedhæftede filer";

/// Titles and subjects written on the records created for a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseTexts {
    pub kind: &'static str,
    pub task_title: String,
    pub case_note_subject: String,
    pub inquiry_reason: String,
    pub document_title: String,
}

impl CaseTexts {
    pub fn new(fact: &BusinessFact, today: NaiveDate) -> Self {
        let kind = if fact.is_reapplication {
            REAPPLICATION
        } else {
            APPLICATION
        };
        let stamp = today.format("%y%m%d");
        let aid = fact.aid_type.as_str();
        let suffix = if fact.attachment_ids.is_empty() {
            ""
        } else {
            ATTACHMENTS_SUFFIX
        };

        Self {
            kind,
            task_title: format!("{stamp} - {kind} - {aid}"),
            case_note_subject: format!("{stamp}, {kind} - {aid}"),
            inquiry_reason: format!("{kind} - {aid}{suffix}"),
            document_title: format!("{kind} {aid}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(is_reapplication: bool, attachment_ids: Vec<String>) -> BusinessFact {
        BusinessFact {
            applicant_id: None,
            is_reapplication,
            aid_type: "Rollator".to_string(),
            attachment_ids,
            process_id: "P-1".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).expect("valid date")
    }

    #[test]
    fn first_application_texts() {
        let texts = CaseTexts::new(&fact(false, Vec::new()), today());
        assert_eq!(texts.kind, "Ansøgning");
        assert_eq!(texts.task_title, "250307 - Ansøgning - Rollator");
        assert_eq!(texts.case_note_subject, "250307, Ansøgning - Rollator");
        assert_eq!(texts.inquiry_reason, "Ansøgning - Rollator");
        assert_eq!(texts.document_title, "Ansøgning Rollator");
    }

    #[test]
    fn reapplication_with_attachments_mentions_files() {
        let texts = CaseTexts::new(&fact(true, vec!["doc-1".to_string()]), today());
        assert_eq!(texts.task_title, "250307 - Genansøgning - Rollator");
        assert_eq!(
            texts.inquiry_reason,
            "Genansøgning - Rollator - Vedhæftede filer"
        );
    }
}
