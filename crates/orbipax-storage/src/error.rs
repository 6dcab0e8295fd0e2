use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use orbipax_core::error::MappingError;

/// Adapter internals. Never shown to users.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("stored record is unreadable: {0}")]
    Mapping(#[from] MappingError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),
}

/// Internal error code, stable across adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ValidationFailed,
    NotMember,
    WriteFailed,
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "validation_failed",
            ErrorCode::NotMember => "not_member",
            ErrorCode::WriteFailed => "write_failed",
            ErrorCode::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("record rejected: {0}")]
    ValidationFailed(String),

    #[error("organization {organization_id} is outside this store's scope")]
    NotMember { organization_id: Uuid },

    #[error("write failed: {0}")]
    WriteFailed(#[source] StorageError),

    #[error("storage error: {0}")]
    Unknown(#[source] StorageError),
}

impl PersistenceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PersistenceError::ValidationFailed(_) => ErrorCode::ValidationFailed,
            PersistenceError::NotMember { .. } => ErrorCode::NotMember,
            PersistenceError::WriteFailed(_) => ErrorCode::WriteFailed,
            PersistenceError::Unknown(_) => ErrorCode::Unknown,
        }
    }

    /// Message safe to show the person filling in the form. Contains no
    /// record content.
    pub fn user_message(&self) -> &'static str {
        match self.code() {
            ErrorCode::ValidationFailed => {
                "Some information on this step is invalid. Please review it and try again."
            }
            ErrorCode::NotMember => "You do not have access to this organization's records.",
            ErrorCode::WriteFailed => "Your changes could not be saved. Please try again.",
            ErrorCode::Unknown => "Something went wrong. Please try again.",
        }
    }
}
