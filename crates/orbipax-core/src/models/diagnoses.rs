use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Clinical history: presenting problem, working diagnoses, prior care.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct ClinicalHistory {
    pub presenting_problem: String,
    pub diagnoses: Vec<Diagnosis>,
    pub has_prior_treatment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_treatment_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct Diagnosis {
    pub code: String,
    pub description: String,
    pub is_primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onset_date: Option<jiff::civil::Date>,
}
