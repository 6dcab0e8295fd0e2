use orbipax_core::step::WizardStepId;

use crate::StepSchema;
use crate::engine::lookup;
use crate::rules::{Condition, FieldKind, FieldSpec};

pub struct ReferralsSchema;

pub const REFERRAL_SOURCES: &[&str] =
    &["self", "family", "pcp", "hospital", "court", "school", "other"];

const REFERRED_BY_SOMEONE_ELSE: Condition = Condition {
    description: "referral did not come from the client",
    holds: |doc| lookup::text(doc, "referralSource").is_some_and(|source| source != "self"),
};

const SERVICE: FieldKind = FieldKind::Text { min: 1, max: 100 };

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required(
        "referralSource",
        "Referral source",
        FieldKind::OneOf(REFERRAL_SOURCES),
    ),
    FieldSpec::required_when(
        "referrerName",
        "Referrer name",
        REFERRED_BY_SOMEONE_ELSE,
        FieldKind::Name,
    ),
    FieldSpec::optional("referrerPhone", "Referrer phone", FieldKind::Phone),
    FieldSpec::required("reason", "Reason for referral", FieldKind::Text { min: 5, max: 1000 }),
    FieldSpec::required(
        "requestedServices",
        "Requested services",
        FieldKind::List {
            item: &SERVICE,
            min: 1,
            max: 10,
        },
    ),
];

impl StepSchema for ReferralsSchema {
    fn step(&self) -> WizardStepId {
        WizardStepId::Referrals
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }
}
