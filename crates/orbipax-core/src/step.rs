use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// One page of the intake wizard. Declaration order is the canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum WizardStepId {
    Welcome,
    Demographics,
    Insurance,
    Diagnoses,
    MedicalProviders,
    Medications,
    Referrals,
    Goals,
    LegalForms,
    Review,
}

impl WizardStepId {
    pub const ALL: [WizardStepId; 10] = [
        WizardStepId::Welcome,
        WizardStepId::Demographics,
        WizardStepId::Insurance,
        WizardStepId::Diagnoses,
        WizardStepId::MedicalProviders,
        WizardStepId::Medications,
        WizardStepId::Referrals,
        WizardStepId::Goals,
        WizardStepId::LegalForms,
        WizardStepId::Review,
    ];

    /// The wire identifier (e.g. `"medical-providers"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStepId::Welcome => "welcome",
            WizardStepId::Demographics => "demographics",
            WizardStepId::Insurance => "insurance",
            WizardStepId::Diagnoses => "diagnoses",
            WizardStepId::MedicalProviders => "medical-providers",
            WizardStepId::Medications => "medications",
            WizardStepId::Referrals => "referrals",
            WizardStepId::Goals => "goals",
            WizardStepId::LegalForms => "legal-forms",
            WizardStepId::Review => "review",
        }
    }

    /// Human-readable title shown in the stepper.
    pub fn title(&self) -> &'static str {
        match self {
            WizardStepId::Welcome => "Welcome",
            WizardStepId::Demographics => "Demographics",
            WizardStepId::Insurance => "Insurance",
            WizardStepId::Diagnoses => "Clinical History",
            WizardStepId::MedicalProviders => "Medical Providers",
            WizardStepId::Medications => "Medications",
            WizardStepId::Referrals => "Referrals",
            WizardStepId::Goals => "Treatment Goals",
            WizardStepId::LegalForms => "Legal Forms",
            WizardStepId::Review => "Review",
        }
    }
}

impl fmt::Display for WizardStepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WizardStepId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WizardStepId::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| CoreError::UnknownStep(s.to_string()))
    }
}

/// One entry of the navigator configuration. The ordered list of these is
/// the only source of truth for step order and optionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StepConfig {
    pub id: WizardStepId,
    #[serde(default)]
    pub is_optional: bool,
}

impl StepConfig {
    pub const fn required(id: WizardStepId) -> Self {
        Self {
            id,
            is_optional: false,
        }
    }

    pub const fn optional(id: WizardStepId) -> Self {
        Self {
            id,
            is_optional: true,
        }
    }
}

/// The standard ten-step intake flow.
pub fn default_steps() -> Vec<StepConfig> {
    WizardStepId::ALL
        .into_iter()
        .map(|id| match id {
            WizardStepId::MedicalProviders | WizardStepId::Referrals => StepConfig::optional(id),
            _ => StepConfig::required(id),
        })
        .collect()
}
