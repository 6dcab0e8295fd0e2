use orbipax_core::step::WizardStepId;

use crate::StepSchema;
use crate::rules::{FieldKind, FieldSpec};

pub struct WelcomeSchema;

const FIELDS: &[FieldSpec] = &[FieldSpec::required(
    "acknowledged",
    "Acknowledgement of the intake process",
    FieldKind::MustBeTrue,
)];

impl StepSchema for WelcomeSchema {
    fn step(&self) -> WizardStepId {
        WizardStepId::Welcome
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }
}
