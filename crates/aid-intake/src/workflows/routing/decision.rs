use super::{RoutingError, RuleTable};
use crate::workflows::intake::BusinessFact;
use serde::{Deserialize, Serialize};

/// Names of the rule sheets consulted when routing a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingSheets {
    pub organization: String,
    pub case_area: String,
}

impl Default for RoutingSheets {
    fn default() -> Self {
        Self {
            organization: "Opgaveansvarlig organisation".to_string(),
            case_area: "XFlow - Nexus oversættelse".to_string(),
        }
    }
}

/// Where a case is created and which case area it is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseRouting {
    pub organization: String,
    pub case_area: String,
}

impl CaseRouting {
    /// The responsible organization is keyed by the aid category (the text before the
    /// first `-`); the case area by the full aid type.
    pub fn resolve(
        fact: &BusinessFact,
        table: &RuleTable,
        sheets: &RoutingSheets,
    ) -> Result<Self, RoutingError> {
        let organization = table.lookup(&sheets.organization, aid_category(&fact.aid_type))?;
        let case_area = table.lookup(&sheets.case_area, fact.aid_type.trim())?;

        Ok(Self {
            organization: organization.to_string(),
            case_area: case_area.to_string(),
        })
    }
}

fn aid_category(aid_type: &str) -> &str {
    aid_type.split('-').next().unwrap_or_default().trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(aid_type: &str) -> BusinessFact {
        BusinessFact {
            applicant_id: Some("0101011234".to_string()),
            is_reapplication: false,
            aid_type: aid_type.to_string(),
            attachment_ids: Vec::new(),
            process_id: "P-1".to_string(),
        }
    }

    fn table() -> RuleTable {
        RuleTable::from_sheets([
            (
                "Opgaveansvarlig organisation",
                vec![("Brystprotese", "Hjælpemidler Nord"), ("Andet", "Hjælpemidler Myndighed")],
            ),
            (
                "XFlow - Nexus oversættelse",
                vec![("Brystprotese - højre", "Brystproteser")],
            ),
        ])
    }

    #[test]
    fn category_and_full_type_select_routing() {
        let routing = CaseRouting::resolve(
            &fact(" Brystprotese - højre "),
            &table(),
            &RoutingSheets::default(),
        )
        .expect("routes");

        assert_eq!(routing.organization, "Hjælpemidler Nord");
        assert_eq!(routing.case_area, "Brystproteser");
    }

    #[test]
    fn unknown_category_falls_back_but_unknown_case_area_fails() {
        let error = CaseRouting::resolve(&fact("Paryk - kunsthår"), &table(), &RoutingSheets::default())
            .expect_err("case area missing");
        assert_eq!(error.sheet, "XFlow - Nexus oversættelse");
        assert_eq!(error.key, "Paryk - kunsthår");
    }

    #[test]
    fn aid_category_stops_at_first_dash() {
        assert_eq!(aid_category("Brystprotese - højre - silikone"), "Brystprotese");
        assert_eq!(aid_category("Rollator"), "Rollator");
        assert_eq!(aid_category(""), "");
    }
}
