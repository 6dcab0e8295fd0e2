//! Legal consents.
//!
//! Which forms must be signed is data, not branching: [`FORM_RULES`] pairs
//! every form with a [`FormRule`]. The release-of-information form is
//! optional unless the client authorized sharing with their PCP. Minors
//! additionally need a guardian co-signature on every form they sign.

use orbipax_core::models::legal::FormId;
use orbipax_core::step::WizardStepId;
use serde_json::Value;

use crate::StepSchema;
use crate::engine::{lookup, present};
use crate::rules::{
    Condition, CrossCheck, DateBound, Document, FieldKind, FieldSpec, ValidationContext,
    ValidationIssue,
};

pub struct LegalFormsSchema;

#[derive(Debug, Clone, Copy)]
pub enum FormRule {
    Required,
    Optional,
    OptionalUnless(Condition),
}

impl FormRule {
    /// Whether the form must be read and signed for this document.
    pub fn applies(&self, doc: &Document) -> bool {
        match self {
            FormRule::Required => true,
            FormRule::Optional => false,
            FormRule::OptionalUnless(condition) => condition.evaluate(doc),
        }
    }
}

pub const SHARES_WITH_PCP: Condition = Condition {
    description: "client authorized sharing records with their PCP",
    holds: |doc| Condition::flag(doc, "authorizedToShareWithPCP"),
};

pub const FORM_RULES: &[(FormId, FormRule)] = &[
    (FormId::Hipaa, FormRule::Required),
    (FormId::ConsentTreatment, FormRule::Required),
    (FormId::Financial, FormRule::Required),
    (FormId::Telehealth, FormRule::Optional),
    (FormId::Roi, FormRule::OptionalUnless(SHARES_WITH_PCP)),
];

const FORM_FIELDS: &[FieldSpec] = &[
    FieldSpec::optional("isRequired", "Required flag", FieldKind::Bool),
    FieldSpec::optional("isRead", "Read acknowledgement", FieldKind::Bool),
    FieldSpec::optional("signature", "Signature", FieldKind::Name),
    FieldSpec::optional("guardianSignature", "Guardian signature", FieldKind::Name),
    FieldSpec::optional(
        "signatureDate",
        "Signature date",
        FieldKind::Date(DateBound::NotFuture),
    ),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("isMinor", "Minor status", FieldKind::Bool),
    FieldSpec::optional(
        "authorizedToShareWithPCP",
        "Authorization to share with PCP",
        FieldKind::Bool,
    ),
    FieldSpec::optional("hipaa", "HIPAA notice", FieldKind::Object(FORM_FIELDS)),
    FieldSpec::optional(
        "consentTreatment",
        "Consent for treatment",
        FieldKind::Object(FORM_FIELDS),
    ),
    FieldSpec::optional("financial", "Financial agreement", FieldKind::Object(FORM_FIELDS)),
    FieldSpec::optional("telehealth", "Telehealth consent", FieldKind::Object(FORM_FIELDS)),
    FieldSpec::optional("roi", "Release of information", FieldKind::Object(FORM_FIELDS)),
];

pub fn form_rule(form: FormId) -> FormRule {
    FORM_RULES
        .iter()
        .find(|(id, _)| *id == form)
        .map(|(_, rule)| *rule)
        .unwrap_or(FormRule::Optional)
}

/// Forms in force, plus any form the client chose to sign, must be read and
/// carry a signature. An absent form is treated as an empty one so issues
/// land on its `isRead` / `signature` fields.
fn forms_in_force_are_signed(
    doc: &Document,
    _ctx: &ValidationContext,
    issues: &mut Vec<ValidationIssue>,
) {
    let blank = Document::new();
    for (form, rule) in FORM_RULES {
        let key = form.key();
        let record = lookup::object(doc, key).unwrap_or(&blank);
        let signed = present(record, "signature").is_some();
        if !rule.applies(doc) && !signed {
            continue;
        }
        if !lookup::is_true(record, "isRead") {
            issues.push(ValidationIssue::new(
                &[key, "isRead"],
                format!("The {} must be read before signing", form.title()),
            ));
        }
        if !signed {
            issues.push(ValidationIssue::new(
                &[key, "signature"],
                format!("A signature is required on the {}", form.title()),
            ));
        }
    }
}

/// A minor's signature needs a guardian co-signature. Format problems with a
/// present guardian signature are already reported by the per-field pass.
fn minors_need_guardian(
    doc: &Document,
    _ctx: &ValidationContext,
    issues: &mut Vec<ValidationIssue>,
) {
    if !lookup::is_true(doc, "isMinor") {
        return;
    }
    for (form, _) in FORM_RULES {
        let key = form.key();
        let Some(record) = lookup::object(doc, key) else {
            continue;
        };
        if present(record, "signature").is_some() && present(record, "guardianSignature").is_none()
        {
            issues.push(ValidationIssue::new(
                &[key, "guardianSignature"],
                "Guardian signature is required for minors",
            ));
        }
    }
}

const CHECKS: &[CrossCheck] = &[forms_in_force_are_signed, minors_need_guardian];

impl StepSchema for LegalFormsSchema {
    fn step(&self) -> WizardStepId {
        WizardStepId::LegalForms
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn checks(&self) -> &'static [CrossCheck] {
        CHECKS
    }

    /// Stamp every form's `isRequired` from the rule table; the client's
    /// own value is never trusted. Unsigned forms keep an empty signature.
    fn prepare(&self, doc: &mut Document) {
        for (form, rule) in FORM_RULES {
            let required = rule.applies(doc);
            let entry = doc
                .entry(form.key())
                .or_insert_with(|| Value::Object(Document::new()));
            if let Value::Object(record) = entry {
                record.insert("isRequired".to_string(), Value::Bool(required));
                record
                    .entry("signature")
                    .or_insert_with(|| Value::String(String::new()));
            }
        }
    }
}
