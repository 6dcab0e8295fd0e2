use std::path::{Path, PathBuf};

use orbipax_core::step::{StepConfig, default_steps};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbipaxConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub organization_id: Uuid,
    #[serde(default)]
    pub allow_skip_ahead: bool,
    /// Ordered step list. Added in v1; older configs get the default list.
    pub steps: Vec<StepConfig>,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Records live only as long as the process.
    Memory,
    File {
        root: PathBuf,
    },
    S3 {
        bucket: String,
        region: String,
    },
}

impl OrbipaxConfig {
    pub fn new(organization_id: Uuid, storage: StorageConfig) -> Self {
        Self {
            config_version: CURRENT_VERSION,
            organization_id,
            allow_skip_ahead: false,
            steps: default_steps(),
            storage,
        }
    }
}

fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.orbipax.intake"))
}

pub fn default_config_path() -> eyre::Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Where `init` puts file-backed records unless told otherwise.
pub fn default_storage_root() -> eyre::Result<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| eyre::eyre!("no data directory found"))?;
    Ok(base.join("com.orbipax.intake").join("records"))
}

pub fn load_config_from(path: &Path) -> eyre::Result<OrbipaxConfig> {
    if !path.exists() {
        return Err(eyre::eyre!(
            "no config at {}; run `orbipax init --organization <uuid>` first",
            path.display()
        ));
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: OrbipaxConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update orbipax."
        ));
    }

    // v0 → v1: add the step list and the skip-ahead flag
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if !obj.contains_key("steps") {
            obj.insert("steps".to_string(), serde_json::to_value(default_steps())?);
        }
        obj.entry("allow_skip_ahead")
            .or_insert(serde_json::Value::Bool(false));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added steps)");
    }

    Ok(json)
}

pub fn save_config_to(config: &OrbipaxConfig, path: &Path) -> eyre::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
