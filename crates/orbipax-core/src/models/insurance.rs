use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct Insurance {
    pub has_insurance: bool,
    pub coverages: Vec<InsuranceCoverage>,
}

impl Insurance {
    pub fn primary(&self) -> Option<&InsuranceCoverage> {
        self.coverages.iter().find(|c| c.is_primary)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct InsuranceCoverage {
    pub carrier: String,
    pub member_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_number: Option<String>,
    pub subscriber_name: String,
    pub relationship_to_subscriber: SubscriberRelationship,
    pub effective_date: jiff::civil::Date,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<jiff::civil::Date>,
    pub is_primary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SubscriberRelationship {
    #[serde(rename = "self")]
    SelfInsured,
    Spouse,
    Child,
    Other,
}
