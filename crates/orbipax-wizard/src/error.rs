use orbipax_core::error::MappingError;
use orbipax_core::step::WizardStepId;
use orbipax_schema::error::StepValidationError;
use orbipax_schema::rules::ValidationIssue;
use orbipax_storage::error::PersistenceError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("step list is empty")]
    Empty,

    #[error("step {0} is configured more than once")]
    DuplicateStep(WizardStepId),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{step} has {} validation issue(s)", issues.len())]
    Validation {
        step: WizardStepId,
        issues: Vec<ValidationIssue>,
    },

    #[error("a save for {step} is already in flight")]
    SaveInFlight { step: WizardStepId },

    #[error("{step} is not part of this intake")]
    UnknownStep { step: WizardStepId },

    #[error("save result for patient {actual} applied to the session for {expected}")]
    PatientMismatch { expected: Uuid, actual: Uuid },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Schema(StepValidationError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl From<StepValidationError> for SessionError {
    fn from(err: StepValidationError) -> Self {
        match err {
            StepValidationError::Invalid { step, issues } => SessionError::Validation { step, issues },
            other => SessionError::Schema(other),
        }
    }
}
