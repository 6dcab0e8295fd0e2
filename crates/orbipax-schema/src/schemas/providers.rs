use orbipax_core::step::WizardStepId;

use crate::StepSchema;
use crate::rules::{Condition, FieldKind, FieldSpec};

pub struct MedicalProvidersSchema;

const HAS_PCP: Condition = Condition {
    description: "client has a primary care provider",
    holds: |doc| Condition::flag(doc, "hasPcp"),
};

const HAS_PSYCHIATRIST: Condition = Condition {
    description: "client sees a psychiatrist",
    holds: |doc| Condition::flag(doc, "hasPsychiatrist"),
};

const PROVIDER: &[FieldSpec] = &[
    FieldSpec::required("name", "Provider name", FieldKind::Name),
    FieldSpec::optional("practice", "Practice", FieldKind::Text { min: 1, max: 120 }),
    FieldSpec::required("phone", "Provider phone", FieldKind::Phone),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("hasPcp", "Primary care provider status", FieldKind::Bool),
    FieldSpec::required_when(
        "pcp",
        "Primary care provider",
        HAS_PCP,
        FieldKind::Object(PROVIDER),
    ),
    FieldSpec::optional("hasPsychiatrist", "Psychiatrist status", FieldKind::Bool),
    FieldSpec::required_when(
        "psychiatrist",
        "Psychiatrist",
        HAS_PSYCHIATRIST,
        FieldKind::Object(PROVIDER),
    ),
];

impl StepSchema for MedicalProvidersSchema {
    fn step(&self) -> WizardStepId {
        WizardStepId::MedicalProviders
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }
}
