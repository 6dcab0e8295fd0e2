use std::path::{Path, PathBuf};
use std::sync::Arc;

use orbipax_core::mapper;
use orbipax_core::models::{StepRecord, StoredStepRecord};
use orbipax_core::step::WizardStepId;
use orbipax_schema::error::StepValidationError;
use orbipax_schema::rules::{ValidationContext, ValidationIssue};
use orbipax_schema::{validate_document, validate_step};
use orbipax_storage::file::FileStore;
use orbipax_storage::memory::MemoryStore;
use orbipax_storage::port::IntakeStore;
use orbipax_storage::s3::S3Store;
use orbipax_wizard::navigator::WizardNavigator;
use orbipax_wizard::session::IntakeSession;
use uuid::Uuid;

use crate::config::{self, OrbipaxConfig, StorageConfig};

/// Write a fresh config. Refuses to overwrite an existing one unless
/// `force` is set.
pub fn init(
    path: &Path,
    organization_id: Uuid,
    storage_root: Option<PathBuf>,
    force: bool,
) -> eyre::Result<OrbipaxConfig> {
    if path.exists() && !force {
        return Err(eyre::eyre!(
            "config already exists at {}; pass --force to replace it",
            path.display()
        ));
    }
    let root = match storage_root {
        Some(root) => root,
        None => config::default_storage_root()?,
    };
    let config = OrbipaxConfig::new(organization_id, StorageConfig::File { root });
    config::save_config_to(&config, path)?;
    Ok(config)
}

/// One line per configured step, in order.
pub fn describe_steps(config: &OrbipaxConfig) -> Vec<String> {
    config
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let optional = if step.is_optional { " (optional)" } else { "" };
            format!(
                "{:>2}. {:<18} {}{optional}",
                index + 1,
                step.id.as_str(),
                step.id.title()
            )
        })
        .collect()
}

pub fn read_draft(file: &Path) -> eyre::Result<serde_json::Value> {
    let contents = std::fs::read_to_string(file)
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", file.display()))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Validate a draft. Full mode normalizes first, the way a save would;
/// partial mode checks the draft as typed.
pub fn validate(
    step: WizardStepId,
    draft: &serde_json::Value,
    partial: bool,
    today: jiff::civil::Date,
) -> eyre::Result<Vec<ValidationIssue>> {
    if partial {
        return Ok(validate_document(step, draft, &ValidationContext::partial(today))?);
    }
    match validate_step(step, draft, &ValidationContext::full(today)) {
        Ok(_) => Ok(Vec::new()),
        Err(StepValidationError::Invalid { issues, .. }) => Ok(issues),
        Err(e) => Err(e.into()),
    }
}

pub async fn open_store(config: &OrbipaxConfig) -> Arc<dyn IntakeStore> {
    let organization_id = config.organization_id;
    match &config.storage {
        StorageConfig::Memory => {
            tracing::warn!("memory storage is discarded when the process exits");
            Arc::new(MemoryStore::new(organization_id))
        }
        StorageConfig::File { root } => Arc::new(FileStore::new(organization_id, root)),
        StorageConfig::S3 { bucket, region } => {
            Arc::new(S3Store::connect(bucket, region, organization_id).await)
        }
    }
}

pub fn navigator(config: &OrbipaxConfig) -> eyre::Result<WizardNavigator> {
    let mut navigator = WizardNavigator::new(config.steps.clone())?;
    navigator.set_allow_skip_ahead(config.allow_skip_ahead);
    Ok(navigator)
}

/// Validate and store one step. Returns the issues instead when the draft
/// is invalid.
pub async fn save(
    store: &dyn IntakeStore,
    patient_id: Uuid,
    step: WizardStepId,
    draft: &serde_json::Value,
    today: jiff::civil::Date,
) -> eyre::Result<Vec<ValidationIssue>> {
    let data = match validate_step(step, draft, &ValidationContext::full(today)) {
        Ok(data) => data,
        Err(StepValidationError::Invalid { issues, .. }) => return Ok(issues),
        Err(e) => return Err(e.into()),
    };
    let record = StepRecord::new(
        patient_id,
        store.organization_id(),
        data,
        jiff::Timestamp::now(),
    );
    store.save(patient_id, step, record, today).await.map_err(|e| {
        tracing::error!(code = %e.code(), error = %e, "save failed");
        eyre::eyre!("{} ({})", e.user_message(), e.code())
    })?;
    tracing::info!(%patient_id, %step, "step saved");
    Ok(Vec::new())
}

pub async fn load(
    store: &dyn IntakeStore,
    patient_id: Uuid,
    step: WizardStepId,
) -> eyre::Result<Option<StoredStepRecord>> {
    let record = store.load(patient_id, step).await.map_err(|e| {
        tracing::error!(code = %e.code(), error = %e, "load failed");
        eyre::eyre!("{} ({})", e.user_message(), e.code())
    })?;
    Ok(record
        .map(|record| mapper::record_to_storage(&record))
        .transpose()?)
}

pub async fn submit(
    config: &OrbipaxConfig,
    store: Arc<dyn IntakeStore>,
    patient_id: Uuid,
    today: jiff::civil::Date,
) -> eyre::Result<Vec<ValidationIssue>> {
    let session = IntakeSession::new(store, patient_id, navigator(config)?).with_today(today);
    Ok(session.submit().await?)
}
