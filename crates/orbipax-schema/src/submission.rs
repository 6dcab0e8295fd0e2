//! Final-submission check run from the review step.
//!
//! This is the only place that looks at more than one step at a time:
//! required steps must be present, every stored record must still pass
//! its own schema, and a few facts must agree across steps. Goal target
//! dates are not held against today again.

use std::collections::BTreeMap;

use orbipax_core::mapper;
use orbipax_core::models::{StepData, StepRecord};
use orbipax_core::step::{StepConfig, WizardStepId};
use serde_json::Value;

use crate::rules::{ValidationContext, ValidationIssue};
use crate::validate_map;

pub const AGE_OF_MAJORITY: i32 = 18;

/// Check the full intake for one patient. An empty result means the intake
/// is ready to submit.
pub fn check_submission(
    steps: &[StepConfig],
    records: &BTreeMap<WizardStepId, StepRecord>,
    ctx: &ValidationContext,
) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for config in steps {
        if config.is_optional || records.contains_key(&config.id) {
            continue;
        }
        issues.push(ValidationIssue::new(
            &[config.id.as_str()],
            format!("{} must be completed before submission", config.id.title()),
        ));
    }

    let recheck = ValidationContext::recheck(ctx.today);
    for (step, record) in records {
        match mapper::to_storage(record.data()) {
            Ok(Value::Object(doc)) => issues.extend(
                validate_map(*step, &doc, &recheck)
                    .into_iter()
                    .map(|issue| issue.nested_under(step.as_str())),
            ),
            Ok(_) | Err(_) => issues.push(ValidationIssue::new(
                &[step.as_str()],
                format!("{} could not be read back for review", step.title()),
            )),
        }
    }

    check_minor_status(records, ctx, &mut issues);
    check_pcp_sharing(records, &mut issues);
    issues
}

/// The minor flag on the legal step has to match the date of birth.
fn check_minor_status(
    records: &BTreeMap<WizardStepId, StepRecord>,
    ctx: &ValidationContext,
    issues: &mut Vec<ValidationIssue>,
) {
    let demographics = records.get(&WizardStepId::Demographics).map(StepRecord::data);
    let legal = records.get(&WizardStepId::LegalForms).map(StepRecord::data);
    let (Some(StepData::Demographics(demographics)), Some(StepData::LegalForms(legal))) =
        (demographics, legal)
    else {
        return;
    };

    let is_minor_by_age = demographics.age_on(ctx.today) < AGE_OF_MAJORITY;
    if is_minor_by_age != legal.is_minor {
        let message = if is_minor_by_age {
            "Client is under 18 according to their date of birth; minor consent rules apply"
        } else {
            "Client is marked as a minor but is 18 or older according to their date of birth"
        };
        issues.push(ValidationIssue::new(
            &[WizardStepId::LegalForms.as_str(), "isMinor"],
            message,
        ));
    }
}

/// Sharing with a PCP only makes sense if the providers step names one.
fn check_pcp_sharing(
    records: &BTreeMap<WizardStepId, StepRecord>,
    issues: &mut Vec<ValidationIssue>,
) {
    let legal = records.get(&WizardStepId::LegalForms).map(StepRecord::data);
    let providers = records.get(&WizardStepId::MedicalProviders).map(StepRecord::data);
    if let (Some(StepData::LegalForms(legal)), Some(StepData::MedicalProviders(providers))) =
        (legal, providers)
        && legal.authorized_to_share_with_pcp
        && providers.pcp.is_none()
    {
        issues.push(ValidationIssue::new(
            &[WizardStepId::MedicalProviders.as_str(), "pcp"],
            "A primary care provider is required when sharing with the PCP is authorized",
        ));
    }
}
