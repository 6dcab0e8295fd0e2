use orbipax_core::error::MappingError;
use orbipax_core::step::WizardStepId;
use thiserror::Error;

use crate::rules::ValidationIssue;

#[derive(Debug, Error)]
pub enum StepValidationError {
    /// The only fatal validation outcome: the draft is not a JSON object.
    #[error("{step} draft must be a JSON object")]
    NotAnObject { step: WizardStepId },

    #[error("{step} failed validation with {} issue(s)", issues.len())]
    Invalid {
        step: WizardStepId,
        issues: Vec<ValidationIssue>,
    },

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

impl StepValidationError {
    /// Field-level issues, if this is a validation failure.
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            StepValidationError::Invalid { issues, .. } => issues,
            _ => &[],
        }
    }
}
