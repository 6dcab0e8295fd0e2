use aws_sdk_s3::Client;
use orbipax_core::models::StepRecord;
use orbipax_core::step::WizardStepId;
use orbipax_core::storage_keys;
use uuid::Uuid;

use crate::client::build_client;
use crate::error::{PersistenceError, StorageError};
use crate::objects;
use crate::port::{BoxFuture, IntakeStore, check_record, decode_record, encode_record};

/// Records as JSON objects in an S3 bucket, keyed by storage key.
pub struct S3Store {
    client: Client,
    bucket: String,
    organization_id: Uuid,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>, organization_id: Uuid) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            organization_id,
        }
    }

    /// Connect with the default credential chain.
    pub async fn connect(bucket: &str, region: &str, organization_id: Uuid) -> Self {
        Self::new(build_client(region).await, bucket, organization_id)
    }
}

impl IntakeStore for S3Store {
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
            let body = match objects::get_object(&self.client, &self.bucket, &key).await {
                Ok(body) => body,
                Err(StorageError::NotFound { .. }) => return Ok(None),
                Err(e) => {
                    tracing::warn!(bucket = %self.bucket, error = %e, "failed to load record");
                    return Err(PersistenceError::Unknown(e));
                }
            };
            decode_record(self.organization_id, patient_id, step, &body).map(Some)
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
            let body = encode_record(&stored)?;
            let key = storage_keys::step_record(self.organization_id, patient_id, step);
            objects::put_json(&self.client, &self.bucket, &key, body)
                .await
                .map_err(|e| {
                    tracing::warn!(bucket = %self.bucket, error = %e, "failed to save record");
                    PersistenceError::WriteFailed(e)
                })?;
            tracing::debug!(bucket = %self.bucket, %step, "record saved to S3");
            Ok(())
        })
    }
}
