use orbipax_core::step::WizardStepId;

use crate::StepSchema;
use crate::engine::lookup;
use crate::rules::{
    Condition, CrossCheck, DateBound, Document, FieldKind, FieldSpec, ValidationContext,
    ValidationIssue,
};

pub struct MedicationsSchema;

pub const MEDICATION_STATUSES: &[&str] = &["yes", "no", "unknown"];
pub const ROUTES: &[&str] = &["oral", "topical", "injection", "inhalation", "other"];
pub const SEVERITIES: &[&str] = &["mild", "moderate", "severe"];

const TAKES_MEDICATIONS: Condition = Condition {
    description: "client reports taking medications",
    holds: |doc| lookup::text(doc, "hasMedications") == Some("yes"),
};

const MEDICATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name", "Medication name", FieldKind::Text { min: 1, max: 100 }),
    FieldSpec::required("dosage", "Dosage", FieldKind::Text { min: 1, max: 50 }),
    FieldSpec::required("frequency", "Frequency", FieldKind::Text { min: 1, max: 50 }),
    FieldSpec::required("route", "Route", FieldKind::OneOf(ROUTES)),
    FieldSpec::optional("prescribedBy", "Prescriber", FieldKind::Name),
    FieldSpec::optional("startDate", "Start date", FieldKind::Date(DateBound::NotFuture)),
];

const ALLERGY_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("allergen", "Allergen", FieldKind::Text { min: 1, max: 100 }),
    FieldSpec::optional("reaction", "Reaction", FieldKind::Text { min: 1, max: 200 }),
    FieldSpec::required("severity", "Severity", FieldKind::OneOf(SEVERITIES)),
];

const MEDICATION: FieldKind = FieldKind::Object(MEDICATION_FIELDS);
const ALLERGY: FieldKind = FieldKind::Object(ALLERGY_FIELDS);

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required(
        "hasMedications",
        "Current medications",
        FieldKind::OneOf(MEDICATION_STATUSES),
    ),
    FieldSpec::required_when(
        "medications",
        "Medications",
        TAKES_MEDICATIONS,
        FieldKind::List {
            item: &MEDICATION,
            min: 0,
            max: 50,
        },
    ),
    FieldSpec::optional(
        "allergies",
        "Allergies",
        FieldKind::List {
            item: &ALLERGY,
            min: 0,
            max: 50,
        },
    ),
];

fn medications_match_answer(
    doc: &Document,
    _ctx: &ValidationContext,
    issues: &mut Vec<ValidationIssue>,
) {
    let answer = lookup::text(doc, "hasMedications");
    match (answer, lookup::len(doc, "medications")) {
        (Some("yes"), Some(0)) => issues.push(ValidationIssue::new(
            &["medications"],
            "List at least one medication or change the answer",
        )),
        (Some("no"), Some(n)) if n > 0 => issues.push(ValidationIssue::new(
            &["medications"],
            "Remove the listed medications or change the answer",
        )),
        _ => {}
    }
}

const CHECKS: &[CrossCheck] = &[medications_match_answer];

impl StepSchema for MedicationsSchema {
    fn step(&self) -> WizardStepId {
        WizardStepId::Medications
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn checks(&self) -> &'static [CrossCheck] {
        CHECKS
    }
}
