use orbipax_core::normalize::normalize_phone_number;
use orbipax_core::step::WizardStepId;

use crate::StepSchema;
use crate::engine::lookup;
use crate::rules::{
    CrossCheck, DateBound, Document, FieldKind, FieldSpec, ValidationContext, ValidationIssue,
};

pub struct DemographicsSchema;

pub const GENDERS: &[&str] = &["male", "female", "non_binary", "other", "prefer_not_to_say"];

const ADDRESS: &[FieldSpec] = &[
    FieldSpec::required("street1", "Street address", FieldKind::Text { min: 1, max: 100 }),
    FieldSpec::optional("street2", "Street address line 2", FieldKind::Text { min: 1, max: 100 }),
    FieldSpec::required("city", "City", FieldKind::Text { min: 1, max: 60 }),
    FieldSpec::required("state", "State", FieldKind::StateCode),
    FieldSpec::required("zipCode", "ZIP code", FieldKind::ZipCode),
];

const EMERGENCY_CONTACT: &[FieldSpec] = &[
    FieldSpec::required("name", "Emergency contact name", FieldKind::Name),
    FieldSpec::required(
        "relationship",
        "Emergency contact relationship",
        FieldKind::Text { min: 1, max: 50 },
    ),
    FieldSpec::required("phone", "Emergency contact phone", FieldKind::Phone),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required("firstName", "First name", FieldKind::Name),
    FieldSpec::optional("middleName", "Middle name", FieldKind::Name),
    FieldSpec::required("lastName", "Last name", FieldKind::Name),
    FieldSpec::optional("preferredName", "Preferred name", FieldKind::Name),
    FieldSpec::required("dateOfBirth", "Date of birth", FieldKind::Date(DateBound::Birth)),
    FieldSpec::required("gender", "Gender", FieldKind::OneOf(GENDERS)),
    FieldSpec::optional("email", "Email", FieldKind::Email),
    FieldSpec::required("phone", "Phone number", FieldKind::Phone),
    FieldSpec::required("address", "Address", FieldKind::Object(ADDRESS)),
    FieldSpec::optional(
        "emergencyContact",
        "Emergency contact",
        FieldKind::Object(EMERGENCY_CONTACT),
    ),
];

/// The emergency contact has to be reachable some other way than the client.
fn emergency_phone_differs(
    doc: &Document,
    _ctx: &ValidationContext,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(own) = lookup::text(doc, "phone") else {
        return;
    };
    let Some(contact) = lookup::object(doc, "emergencyContact") else {
        return;
    };
    if let Some(theirs) = lookup::text(contact, "phone")
        && normalize_phone_number(theirs) == normalize_phone_number(own)
    {
        issues.push(ValidationIssue::new(
            &["emergencyContact", "phone"],
            "Emergency contact phone must differ from the client's phone",
        ));
    }
}

const CHECKS: &[CrossCheck] = &[emergency_phone_differs];

impl StepSchema for DemographicsSchema {
    fn step(&self) -> WizardStepId {
        WizardStepId::Demographics
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn checks(&self) -> &'static [CrossCheck] {
        CHECKS
    }
}
