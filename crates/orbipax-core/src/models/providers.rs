use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct MedicalProviders {
    pub has_pcp: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pcp: Option<Provider>,
    pub has_psychiatrist: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psychiatrist: Option<Provider>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct Provider {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practice: Option<String>,
    pub phone: String,
}
