//! The persistence port.
//!
//! Adapters return boxed futures so the session can hold any of them as an
//! `Arc<dyn IntakeStore>`. The checks every adapter applies before writing,
//! and the decoding every adapter applies after reading, live here so the
//! adapters only move bytes.

use std::future::Future;
use std::pin::Pin;

use orbipax_core::mapper;
use orbipax_core::models::{StepRecord, StoredStepRecord};
use orbipax_core::step::WizardStepId;
use orbipax_schema::rules::ValidationContext;
use orbipax_schema::validate_document;
use uuid::Uuid;

use crate::error::{PersistenceError, StorageError};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Load and save step records for one organization.
pub trait IntakeStore: Send + Sync {
    /// The organization this store is scoped to.
    fn organization_id(&self) -> Uuid;

    /// Load the record for one step. `None` when nothing has been saved yet.
    fn load(
        &self,
        patient_id: Uuid,
        step: WizardStepId,
    ) -> BoxFuture<'_, Result<Option<StepRecord>, PersistenceError>>;

    /// Save the record for one step, replacing any previous one. The record
    /// is re-validated as of `today`, the date its draft was validated on.
    fn save(
        &self,
        patient_id: Uuid,
        step: WizardStepId,
        record: StepRecord,
        today: jiff::civil::Date,
    ) -> BoxFuture<'_, Result<(), PersistenceError>>;
}

/// Reject a record that does not belong under the given key, then convert it
/// to its storage form and re-validate that form in full.
pub fn check_record(
    organization_id: Uuid,
    patient_id: Uuid,
    step: WizardStepId,
    record: &StepRecord,
    today: jiff::civil::Date,
) -> Result<StoredStepRecord, PersistenceError> {
    if record.organization_id() != organization_id {
        tracing::warn!(
            scope = %organization_id,
            record_org = %record.organization_id(),
            "refusing record from another organization"
        );
        return Err(PersistenceError::NotMember {
            organization_id: record.organization_id(),
        });
    }
    if record.patient_id() != patient_id || record.step() != step {
        return Err(PersistenceError::ValidationFailed(format!(
            "record for {}/{} saved under {patient_id}/{step}",
            record.patient_id(),
            record.step()
        )));
    }

    let stored = mapper::record_to_storage(record)
        .map_err(|e| PersistenceError::ValidationFailed(e.to_string()))?;
    let issues = validate_document(step, &stored.data, &ValidationContext::full(today))
        .map_err(|e| PersistenceError::ValidationFailed(e.to_string()))?;
    if let Some(first) = issues.first() {
        tracing::debug!(%step, issues = issues.len(), "record failed re-validation");
        return Err(PersistenceError::ValidationFailed(format!(
            "{step}: {} issue(s), first at {}",
            issues.len(),
            first.path.join(".")
        )));
    }
    Ok(stored)
}

pub fn encode_record(stored: &StoredStepRecord) -> Result<Vec<u8>, PersistenceError> {
    serde_json::to_vec_pretty(stored)
        .map_err(|e| PersistenceError::WriteFailed(StorageError::Serialization(e)))
}

/// Decode stored bytes and make sure they are the record the key promised.
pub fn decode_record(
    organization_id: Uuid,
    patient_id: Uuid,
    step: WizardStepId,
    bytes: &[u8],
) -> Result<StepRecord, PersistenceError> {
    let stored: StoredStepRecord = serde_json::from_slice(bytes)
        .map_err(|e| PersistenceError::Unknown(StorageError::Serialization(e)))?;
    let record = mapper::record_from_storage_for(step, &stored)
        .map_err(|e| PersistenceError::Unknown(StorageError::Mapping(e)))?;
    if record.organization_id() != organization_id {
        return Err(PersistenceError::NotMember {
            organization_id: record.organization_id(),
        });
    }
    if record.patient_id() != patient_id {
        return Err(PersistenceError::ValidationFailed(format!(
            "stored record for {} found under {patient_id}",
            record.patient_id()
        )));
    }
    Ok(record)
}
