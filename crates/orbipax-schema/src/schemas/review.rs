use orbipax_core::step::WizardStepId;

use crate::StepSchema;
use crate::rules::{FieldKind, FieldSpec};

/// The review step's own form. Aggregate checks across steps live in
/// [`crate::submission`].
pub struct ReviewSchema;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required(
        "confirmedAccuracy",
        "Confirmation that the information is accurate",
        FieldKind::MustBeTrue,
    ),
    FieldSpec::optional(
        "reviewerNotes",
        "Reviewer notes",
        FieldKind::Text { min: 1, max: 2000 },
    ),
];

impl StepSchema for ReviewSchema {
    fn step(&self) -> WizardStepId {
        WizardStepId::Review
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }
}
