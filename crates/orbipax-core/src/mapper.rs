//! Conversion between the flat JSON storage shape of a step and its typed
//! canonical shape.
//!
//! Mapping never validates. A document that breaks a business rule still
//! maps; only input outside the storage shape (an unparsable date, a string
//! where a list belongs, a missing or unknown key, a value that would not
//! come back unchanged) is a [`MappingError`]. Whatever `to_canonical`
//! accepts, `to_storage` gives back exactly.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::MappingError;
use crate::models::{StepData, StepRecord, StoredStepRecord};
use crate::step::WizardStepId;

fn decode<T: DeserializeOwned>(step: WizardStepId, value: &Value) -> Result<T, MappingError> {
    T::deserialize(value).map_err(|source| MappingError::Structure { step, source })
}

fn encode<T: Serialize>(data: &T) -> Result<Value, MappingError> {
    Ok(serde_json::to_value(data)?)
}

/// Storage document → canonical step data.
pub fn to_canonical(step: WizardStepId, value: &Value) -> Result<StepData, MappingError> {
    let data = match step {
        WizardStepId::Welcome => StepData::Welcome(decode(step, value)?),
        WizardStepId::Demographics => StepData::Demographics(decode(step, value)?),
        WizardStepId::Insurance => StepData::Insurance(decode(step, value)?),
        WizardStepId::Diagnoses => StepData::Diagnoses(decode(step, value)?),
        WizardStepId::MedicalProviders => StepData::MedicalProviders(decode(step, value)?),
        WizardStepId::Medications => StepData::Medications(decode(step, value)?),
        WizardStepId::Referrals => StepData::Referrals(decode(step, value)?),
        WizardStepId::Goals => StepData::Goals(decode(step, value)?),
        WizardStepId::LegalForms => StepData::LegalForms(decode(step, value)?),
        WizardStepId::Review => StepData::Review(decode(step, value)?),
    };
    if to_storage(&data)? != *value {
        return Err(MappingError::NotCanonical { step });
    }
    Ok(data)
}

/// Canonical step data → storage document.
pub fn to_storage(data: &StepData) -> Result<Value, MappingError> {
    match data {
        StepData::Welcome(d) => encode(d),
        StepData::Demographics(d) => encode(d),
        StepData::Insurance(d) => encode(d),
        StepData::Diagnoses(d) => encode(d),
        StepData::MedicalProviders(d) => encode(d),
        StepData::Medications(d) => encode(d),
        StepData::Referrals(d) => encode(d),
        StepData::Goals(d) => encode(d),
        StepData::LegalForms(d) => encode(d),
        StepData::Review(d) => encode(d),
    }
}

pub fn record_to_storage(record: &StepRecord) -> Result<StoredStepRecord, MappingError> {
    Ok(StoredStepRecord {
        patient_id: record.patient_id(),
        organization_id: record.organization_id(),
        step: record.step(),
        recorded_at: record.recorded_at(),
        data: to_storage(record.data())?,
    })
}

pub fn record_from_storage(stored: &StoredStepRecord) -> Result<StepRecord, MappingError> {
    let data = to_canonical(stored.step, &stored.data)?;
    Ok(StepRecord::new(
        stored.patient_id,
        stored.organization_id,
        data,
        stored.recorded_at,
    ))
}

/// Like [`record_from_storage`], but the stored step must match `expected`.
pub fn record_from_storage_for(
    expected: WizardStepId,
    stored: &StoredStepRecord,
) -> Result<StepRecord, MappingError> {
    if stored.step != expected {
        return Err(MappingError::StepMismatch {
            expected,
            stored: stored.step,
        });
    }
    record_from_storage(stored)
}
