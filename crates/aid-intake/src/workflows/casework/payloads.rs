use chrono::{Duration, NaiveDate};
use serde::Serialize;

const WORKFLOW_DATE_FORMAT: &str = "%d-%m-%Y";
const SIGNATURE_TEXT: &str = "Behandlet af Tyra (RPA)";
const SEARCH_TEXT: &str = "ANSØGNING OM KROPSBÅRNE HJÆLPEMIDLER";
const PROCESS_TEMPLATE_ID: &str = "726";

/// One form value written back to a workflow process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValue {
    pub element_identifier: String,
    pub value_identifier: String,
    pub value: String,
}

impl FormValue {
    fn new(element_identifier: &str, value_identifier: &str, value: impl Into<String>) -> Self {
        Self {
            element_identifier: element_identifier.to_string(),
            value_identifier: value_identifier.to_string(),
            value: value.into(),
        }
    }
}

/// Update marking a process as handled before it is advanced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessUpdate {
    pub form_values: Vec<FormValue>,
}

impl ProcessUpdate {
    pub fn completion(succeeded: bool, today: NaiveDate) -> Self {
        let proceed = if succeeded { "True" } else { "False" };
        Self {
            form_values: vec![
                FormValue::new("RPASignatur", "Tekst", SIGNATURE_TEXT),
                FormValue::new(
                    "RPABehandletDato",
                    "Dato",
                    today.format(WORKFLOW_DATE_FORMAT).to_string(),
                ),
                FormValue::new("ProcesVidereYesNo", "YesSelected", proceed),
            ],
        }
    }
}

/// Search for applications created since yesterday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSearchQuery {
    pub text: String,
    pub process_template_ids: Vec<String>,
    pub start_index: u32,
    pub created_date_from: String,
    pub created_date_to: String,
}

impl ProcessSearchQuery {
    pub fn for_day(today: NaiveDate) -> Self {
        let yesterday = today - Duration::days(1);
        Self {
            text: SEARCH_TEXT.to_string(),
            process_template_ids: vec![PROCESS_TEMPLATE_ID.to_string()],
            start_index: 0,
            created_date_from: yesterday.format(WORKFLOW_DATE_FORMAT).to_string(),
            created_date_to: today.format(WORKFLOW_DATE_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn completion_update_serializes_form_values() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 9).expect("valid date");
        let payload = serde_json::to_value(ProcessUpdate::completion(false, today)).expect("json");

        assert_eq!(
            payload,
            json!({
                "formValues": [
                    { "elementIdentifier": "RPASignatur", "valueIdentifier": "Tekst", "value": "Behandlet af Tyra (RPA)" },
                    { "elementIdentifier": "RPABehandletDato", "valueIdentifier": "Dato", "value": "09-01-2025" },
                    { "elementIdentifier": "ProcesVidereYesNo", "valueIdentifier": "YesSelected", "value": "False" }
                ]
            })
        );
    }

    #[test]
    fn search_window_spans_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
        let query = ProcessSearchQuery::for_day(today);
        assert_eq!(query.created_date_from, "28-02-2025");
        assert_eq!(query.created_date_to, "01-03-2025");
        assert_eq!(query.process_template_ids, ["726"]);

        let payload = serde_json::to_value(&query).expect("json");
        assert_eq!(payload["startIndex"], json!(0));
        assert_eq!(payload["processTemplateIds"], json!(["726"]));
    }
}
