use thiserror::Error;

use crate::step::WizardStepId;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown wizard step: {0}")]
    UnknownStep(String),
}

/// A storage document could not be converted to (or from) its canonical
/// shape. This is structural, not a validation failure.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("{step} document is structurally invalid: {source}")]
    Structure {
        step: WizardStepId,
        #[source]
        source: serde_json::Error,
    },

    /// Parsed, but would not map back to the same document (explicit
    /// nulls, alternative date spellings).
    #[error("{step} document is not in storage form")]
    NotCanonical { step: WizardStepId },

    #[error("stored record is for step {stored} but was read as {expected}")]
    StepMismatch {
        expected: WizardStepId,
        stored: WizardStepId,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
