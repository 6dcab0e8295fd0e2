pub mod demographics;
pub mod diagnoses;
pub mod goals;
pub mod insurance;
pub mod legal;
pub mod medications;
pub mod providers;
pub mod referrals;
pub mod review;
pub mod welcome;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::step::WizardStepId;

pub use demographics::Demographics;
pub use diagnoses::ClinicalHistory;
pub use goals::TreatmentGoals;
pub use insurance::Insurance;
pub use legal::LegalConsents;
pub use medications::Medications;
pub use providers::MedicalProviders;
pub use referrals::Referrals;
pub use review::Review;
pub use welcome::Welcome;

/// The canonical, validated content of one step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepData {
    Welcome(Welcome),
    Demographics(Demographics),
    Insurance(Insurance),
    Diagnoses(ClinicalHistory),
    MedicalProviders(MedicalProviders),
    Medications(Medications),
    Referrals(Referrals),
    Goals(TreatmentGoals),
    LegalForms(LegalConsents),
    Review(Review),
}

impl StepData {
    pub fn step(&self) -> WizardStepId {
        match self {
            StepData::Welcome(_) => WizardStepId::Welcome,
            StepData::Demographics(_) => WizardStepId::Demographics,
            StepData::Insurance(_) => WizardStepId::Insurance,
            StepData::Diagnoses(_) => WizardStepId::Diagnoses,
            StepData::MedicalProviders(_) => WizardStepId::MedicalProviders,
            StepData::Medications(_) => WizardStepId::Medications,
            StepData::Referrals(_) => WizardStepId::Referrals,
            StepData::Goals(_) => WizardStepId::Goals,
            StepData::LegalForms(_) => WizardStepId::LegalForms,
            StepData::Review(_) => WizardStepId::Review,
        }
    }
}

/// The validated output of one step for one patient.
///
/// Fields are private: a record is immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    patient_id: Uuid,
    organization_id: Uuid,
    data: StepData,
    recorded_at: jiff::Timestamp,
}

impl StepRecord {
    pub fn new(
        patient_id: Uuid,
        organization_id: Uuid,
        data: StepData,
        recorded_at: jiff::Timestamp,
    ) -> Self {
        Self {
            patient_id,
            organization_id,
            data,
            recorded_at,
        }
    }

    pub fn patient_id(&self) -> Uuid {
        self.patient_id
    }

    pub fn organization_id(&self) -> Uuid {
        self.organization_id
    }

    pub fn step(&self) -> WizardStepId {
        self.data.step()
    }

    pub fn data(&self) -> &StepData {
        &self.data
    }

    pub fn recorded_at(&self) -> jiff::Timestamp {
        self.recorded_at
    }
}

/// Wire/storage form of a [`StepRecord`]: the step payload stays in its flat
/// JSON storage shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StoredStepRecord {
    pub patient_id: Uuid,
    pub organization_id: Uuid,
    pub step: WizardStepId,
    pub recorded_at: jiff::Timestamp,
    pub data: serde_json::Value,
}
