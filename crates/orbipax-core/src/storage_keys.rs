//! Storage key conventions.
//!
//! Pure string functions. Every key starts with the organization id so an
//! adapter scoped to one organization can never address another's records.

use uuid::Uuid;

use crate::step::WizardStepId;

pub fn patient_prefix(organization_id: Uuid, patient_id: Uuid) -> String {
    format!("intake/{organization_id}/{patient_id}/")
}

pub fn step_record(organization_id: Uuid, patient_id: Uuid, step: WizardStepId) -> String {
    format!("{}{step}.json", patient_prefix(organization_id, patient_id))
}
