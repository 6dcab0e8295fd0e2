use std::collections::HashSet;

use orbipax_core::step::WizardStepId;

use crate::StepSchema;
use crate::engine::lookup;
use crate::rules::{
    Condition, CrossCheck, DateBound, Document, FieldKind, FieldSpec, ValidationContext,
    ValidationIssue,
};

/// Clinical history: presenting problem, working diagnoses, prior care.
pub struct DiagnosesSchema;

pub const MAX_DIAGNOSES: usize = 20;

const HAS_PRIOR_TREATMENT: Condition = Condition {
    description: "client has received prior treatment",
    holds: |doc| Condition::flag(doc, "hasPriorTreatment"),
};

const DIAGNOSIS_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("code", "Diagnosis code", FieldKind::Icd10),
    FieldSpec::required("description", "Diagnosis description", FieldKind::Text { min: 1, max: 200 }),
    FieldSpec::optional("isPrimary", "Primary diagnosis", FieldKind::Bool),
    FieldSpec::optional("onsetDate", "Onset date", FieldKind::Date(DateBound::NotFuture)),
];

const DIAGNOSIS: FieldKind = FieldKind::Object(DIAGNOSIS_FIELDS);

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required(
        "presentingProblem",
        "Presenting problem",
        FieldKind::Text { min: 10, max: 2000 },
    ),
    FieldSpec::optional(
        "diagnoses",
        "Diagnoses",
        FieldKind::List {
            item: &DIAGNOSIS,
            min: 0,
            max: MAX_DIAGNOSES,
        },
    ),
    FieldSpec::required("hasPriorTreatment", "Prior treatment", FieldKind::Bool),
    FieldSpec::required_when(
        "priorTreatmentDetails",
        "Prior treatment details",
        HAS_PRIOR_TREATMENT,
        FieldKind::Text { min: 1, max: 2000 },
    ),
];

fn single_primary(doc: &Document, _ctx: &ValidationContext, issues: &mut Vec<ValidationIssue>) {
    let primaries = lookup::entries(doc, "diagnoses").filter(|(_, d)| lookup::is_true(d, "isPrimary"));
    for (index, _) in primaries.skip(1) {
        issues.push(ValidationIssue::new(
            &["diagnoses", &index.to_string(), "isPrimary"],
            "Only one diagnosis can be primary",
        ));
    }
}

fn unique_codes(doc: &Document, _ctx: &ValidationContext, issues: &mut Vec<ValidationIssue>) {
    let mut seen = HashSet::new();
    for (index, diagnosis) in lookup::entries(doc, "diagnoses") {
        let Some(code) = lookup::text(diagnosis, "code") else {
            continue;
        };
        if !seen.insert(code.to_uppercase()) {
            issues.push(ValidationIssue::new(
                &["diagnoses", &index.to_string(), "code"],
                format!("Diagnosis {code} is listed more than once"),
            ));
        }
    }
}

const CHECKS: &[CrossCheck] = &[single_primary, unique_codes];

impl StepSchema for DiagnosesSchema {
    fn step(&self) -> WizardStepId {
        WizardStepId::Diagnoses
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn checks(&self) -> &'static [CrossCheck] {
        CHECKS
    }
}
