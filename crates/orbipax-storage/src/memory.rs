use std::collections::HashMap;

use orbipax_core::models::{StepRecord, StoredStepRecord};
use orbipax_core::step::WizardStepId;
use orbipax_core::{mapper, storage_keys};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{PersistenceError, StorageError};
use crate::port::{BoxFuture, IntakeStore, check_record};

/// Records kept in process memory, in their storage form.
pub struct MemoryStore {
    organization_id: Uuid,
    records: Mutex<HashMap<String, StoredStepRecord>>,
}

impl MemoryStore {
    pub fn new(organization_id: Uuid) -> Self {
        Self {
            organization_id,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

impl IntakeStore for MemoryStore {
    fn organization_id(&self) -> Uuid {
        self.organization_id
    }

    fn load(
        &self,
        patient_id: Uuid,
        step: WizardStepId,
    ) -> BoxFuture<'_, Result<Option<StepRecord>, PersistenceError>> {
        Box::pin(async move {
            let key = storage_keys::step_record(self.organization_id, patient_id, step);
            let records = self.records.lock().await;
            let Some(stored) = records.get(&key) else {
                return Ok(None);
            };
            let record = mapper::record_from_storage_for(step, stored)
                .map_err(|e| PersistenceError::Unknown(StorageError::Mapping(e)))?;
            Ok(Some(record))
        })
    }

    fn save(
        &self,
        patient_id: Uuid,
        step: WizardStepId,
        record: StepRecord,
        today: jiff::civil::Date,
    ) -> BoxFuture<'_, Result<(), PersistenceError>> {
        Box::pin(async move {
            let stored = check_record(self.organization_id, patient_id, step, &record, today)?;
            let key = storage_keys::step_record(self.organization_id, patient_id, step);
            self.records.lock().await.insert(key, stored);
            tracing::debug!(%patient_id, %step, "record saved in memory");
            Ok(())
        })
    }
}
