use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Signed consent forms collected at intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct LegalConsents {
    pub is_minor: bool,
    #[serde(rename = "authorizedToShareWithPCP")]
    pub authorized_to_share_with_pcp: bool,
    pub hipaa: FormRecord,
    pub consent_treatment: FormRecord,
    pub financial: FormRecord,
    pub telehealth: FormRecord,
    pub roi: FormRecord,
}

impl LegalConsents {
    pub fn form(&self, id: FormId) -> &FormRecord {
        match id {
            FormId::Hipaa => &self.hipaa,
            FormId::ConsentTreatment => &self.consent_treatment,
            FormId::Financial => &self.financial,
            FormId::Telehealth => &self.telehealth,
            FormId::Roi => &self.roi,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[ts(export)]
pub struct FormRecord {
    pub is_required: bool,
    pub is_read: bool,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_date: Option<jiff::civil::Date>,
}

impl FormRecord {
    pub fn is_signed(&self) -> bool {
        !self.signature.trim().is_empty()
    }
}

/// Identifies one consent form. The wire key doubles as the form's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum FormId {
    Hipaa,
    ConsentTreatment,
    Financial,
    Telehealth,
    Roi,
}

impl FormId {
    pub const ALL: [FormId; 5] = [
        FormId::Hipaa,
        FormId::ConsentTreatment,
        FormId::Financial,
        FormId::Telehealth,
        FormId::Roi,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FormId::Hipaa => "hipaa",
            FormId::ConsentTreatment => "consentTreatment",
            FormId::Financial => "financial",
            FormId::Telehealth => "telehealth",
            FormId::Roi => "roi",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormId::Hipaa => "HIPAA Notice of Privacy Practices",
            FormId::ConsentTreatment => "Consent for Treatment",
            FormId::Financial => "Financial Responsibility Agreement",
            FormId::Telehealth => "Telehealth Consent",
            FormId::Roi => "Release of Information",
        }
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
