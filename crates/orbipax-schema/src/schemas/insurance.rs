use orbipax_core::step::WizardStepId;

use crate::StepSchema;
use crate::engine::{lookup, parse_date};
use crate::rules::{
    Condition, CrossCheck, DateBound, Document, FieldKind, FieldSpec, ValidationContext,
    ValidationIssue,
};

pub struct InsuranceSchema;

pub const SUBSCRIBER_RELATIONSHIPS: &[&str] = &["self", "spouse", "child", "other"];

pub const MAX_COVERAGES: usize = 3;

const HAS_INSURANCE: Condition = Condition {
    description: "client reports insurance coverage",
    holds: |doc| Condition::flag(doc, "hasInsurance"),
};

const COVERAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("carrier", "Insurance carrier", FieldKind::Text { min: 1, max: 100 }),
    FieldSpec::required("memberId", "Member ID", FieldKind::MemberId),
    FieldSpec::optional("groupNumber", "Group number", FieldKind::Text { min: 1, max: 30 }),
    FieldSpec::required("subscriberName", "Subscriber name", FieldKind::Name),
    FieldSpec::required(
        "relationshipToSubscriber",
        "Relationship to subscriber",
        FieldKind::OneOf(SUBSCRIBER_RELATIONSHIPS),
    ),
    FieldSpec::required("effectiveDate", "Effective date", FieldKind::Date(DateBound::Any)),
    FieldSpec::optional("expirationDate", "Expiration date", FieldKind::Date(DateBound::Any)),
    FieldSpec::optional("isPrimary", "Primary coverage", FieldKind::Bool),
];

const COVERAGE: FieldKind = FieldKind::Object(COVERAGE_FIELDS);

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("hasInsurance", "Insurance status", FieldKind::Bool),
    FieldSpec::required_when(
        "coverages",
        "Insurance coverage",
        HAS_INSURANCE,
        FieldKind::List {
            item: &COVERAGE,
            min: 0,
            max: MAX_COVERAGES,
        },
    ),
];

fn coverage_matches_status(
    doc: &Document,
    _ctx: &ValidationContext,
    issues: &mut Vec<ValidationIssue>,
) {
    let insured = lookup::is_true(doc, "hasInsurance");
    match lookup::len(doc, "coverages") {
        Some(0) if insured => issues.push(ValidationIssue::new(
            &["coverages"],
            "At least one coverage is required when the client is insured",
        )),
        Some(n) if n > 0 && !insured => issues.push(ValidationIssue::new(
            &["coverages"],
            "Remove coverage details or indicate that the client is insured",
        )),
        _ => {}
    }
}

fn single_primary(doc: &Document, _ctx: &ValidationContext, issues: &mut Vec<ValidationIssue>) {
    let primaries = lookup::entries(doc, "coverages").filter(|(_, c)| lookup::is_true(c, "isPrimary"));
    for (index, _) in primaries.skip(1) {
        issues.push(ValidationIssue::new(
            &["coverages", &index.to_string(), "isPrimary"],
            "Only one coverage can be primary",
        ));
    }
}

fn expiration_after_effective(
    doc: &Document,
    _ctx: &ValidationContext,
    issues: &mut Vec<ValidationIssue>,
) {
    for (index, coverage) in lookup::entries(doc, "coverages") {
        let effective = lookup::text(coverage, "effectiveDate").and_then(parse_date);
        let expiration = lookup::text(coverage, "expirationDate").and_then(parse_date);
        if let (Some(effective), Some(expiration)) = (effective, expiration)
            && expiration < effective
        {
            issues.push(ValidationIssue::new(
                &["coverages", &index.to_string(), "expirationDate"],
                "Expiration date cannot be before the effective date",
            ));
        }
    }
}

const CHECKS: &[CrossCheck] = &[
    coverage_matches_status,
    single_primary,
    expiration_after_effective,
];

impl StepSchema for InsuranceSchema {
    fn step(&self) -> WizardStepId {
        WizardStepId::Insurance
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn checks(&self) -> &'static [CrossCheck] {
        CHECKS
    }
}
