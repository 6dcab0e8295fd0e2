use std::path::{Path, PathBuf};

use orbipax_core::models::StepRecord;
use orbipax_core::step::WizardStepId;
use orbipax_core::storage_keys;
use uuid::Uuid;

use crate::error::{PersistenceError, StorageError};
use crate::port::{BoxFuture, IntakeStore, check_record, decode_record, encode_record};

/// Records as pretty-printed JSON files under `root`, one file per storage
/// key.
pub struct FileStore {
    organization_id: Uuid,
    root: PathBuf,
}

impl FileStore {
    pub fn new(organization_id: Uuid, root: impl Into<PathBuf>) -> Self {
        Self {
            organization_id,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the record for one step lives on disk.
    pub fn path_for(&self, patient_id: Uuid, step: WizardStepId) -> PathBuf {
        self.root
            .join(storage_keys::step_record(self.organization_id, patient_id, step))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write via a sibling temp file and rename so readers never see a partial
/// record.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error(parent, e))?;
    }
    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(|e| io_error(&tmp_path, e))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| io_error(path, e))?;
    Ok(())
}

impl IntakeStore for FileStore {
    fn organization_id(&self) -> Uuid {
        self.organization_id
    }

    fn load(
        &self,
        patient_id: Uuid,
        step: WizardStepId,
    ) -> BoxFuture<'_, Result<Option<StepRecord>, PersistenceError>> {
        Box::pin(async move {
            let path = self.path_for(patient_id, step);
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(PersistenceError::Unknown(io_error(&path, e))),
            };
            decode_record(self.organization_id, patient_id, step, &bytes).map(Some)
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
            let bytes = encode_record(&stored)?;
            let path = self.path_for(patient_id, step);
            write_atomic(&path, &bytes)
                .await
                .map_err(PersistenceError::WriteFailed)?;
            tracing::debug!(path = %path.display(), %step, "record saved to disk");
            Ok(())
        })
    }
}
