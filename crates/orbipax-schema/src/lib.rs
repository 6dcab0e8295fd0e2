//! orbipax-schema
//!
//! Per-step validation for the intake wizard. Each step publishes a
//! declarative rule table plus an ordered list of cross-field checks; the
//! shared engine turns a draft into either canonical step data or an
//! ordered list of field-level issues.

pub mod engine;
pub mod error;
pub mod rules;
pub mod schemas;
pub mod submission;

use orbipax_core::mapper;
use orbipax_core::models::StepData;
use orbipax_core::step::WizardStepId;
use serde_json::Value;

use error::StepValidationError;
use rules::{CrossCheck, Document, FieldSpec, ValidationContext, ValidationIssue};

/// Trait implemented by each wizard step's schema.
pub trait StepSchema: Send + Sync {
    /// The step this schema validates.
    fn step(&self) -> WizardStepId;

    /// Per-field rules, checked in order.
    fn fields(&self) -> &'static [FieldSpec];

    /// Cross-field rules, run after the per-field pass in full mode.
    fn checks(&self) -> &'static [CrossCheck] {
        &[]
    }

    /// Step-specific canonicalization, applied after field normalization.
    fn prepare(&self, _doc: &mut Document) {}

    /// Validate a draft. Never fails: problems come back as issues.
    fn validate(&self, doc: &Document, ctx: &ValidationContext) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let mut path = Vec::new();
        engine::check_fields(self.fields(), doc, doc, &mut path, ctx, &mut issues);
        if ctx.is_full() {
            for check in self.checks() {
                check(doc, ctx, &mut issues);
            }
        }
        issues
    }

    /// Normalize a copy of the draft the way it will be stored.
    fn normalize(&self, doc: &Document) -> Document {
        let mut normalized = doc.clone();
        engine::normalize_fields(self.fields(), &mut normalized);
        self.prepare(&mut normalized);
        normalized
    }
}

/// Return every step schema, in step order.
pub fn all_schemas() -> Vec<Box<dyn StepSchema>> {
    WizardStepId::ALL.into_iter().map(get_schema).collect()
}

/// Look up the schema for a step. Every step has one.
pub fn get_schema(step: WizardStepId) -> Box<dyn StepSchema> {
    match step {
        WizardStepId::Welcome => Box::new(schemas::welcome::WelcomeSchema),
        WizardStepId::Demographics => Box::new(schemas::demographics::DemographicsSchema),
        WizardStepId::Insurance => Box::new(schemas::insurance::InsuranceSchema),
        WizardStepId::Diagnoses => Box::new(schemas::diagnoses::DiagnosesSchema),
        WizardStepId::MedicalProviders => Box::new(schemas::providers::MedicalProvidersSchema),
        WizardStepId::Medications => Box::new(schemas::medications::MedicationsSchema),
        WizardStepId::Referrals => Box::new(schemas::referrals::ReferralsSchema),
        WizardStepId::Goals => Box::new(schemas::goals::GoalsSchema),
        WizardStepId::LegalForms => Box::new(schemas::legal::LegalFormsSchema),
        WizardStepId::Review => Box::new(schemas::review::ReviewSchema),
    }
}

/// Validate a draft map as-is (no normalization).
pub fn validate_map(
    step: WizardStepId,
    doc: &Document,
    ctx: &ValidationContext,
) -> Vec<ValidationIssue> {
    get_schema(step).validate(doc, ctx)
}

/// Validate an arbitrary JSON draft. Non-object input is the one fatal case.
pub fn validate_document(
    step: WizardStepId,
    draft: &Value,
    ctx: &ValidationContext,
) -> Result<Vec<ValidationIssue>, StepValidationError> {
    let doc = draft
        .as_object()
        .ok_or(StepValidationError::NotAnObject { step })?;
    Ok(validate_map(step, doc, ctx))
}

/// Normalize, fully validate and map a draft to its canonical shape.
///
/// `ctx.mode` is ignored: producing step data always takes full validation.
pub fn validate_step(
    step: WizardStepId,
    draft: &Value,
    ctx: &ValidationContext,
) -> Result<StepData, StepValidationError> {
    let doc = draft
        .as_object()
        .ok_or(StepValidationError::NotAnObject { step })?;
    let schema = get_schema(step);
    let mut normalized = schema.normalize(doc);

    let full = ValidationContext::full(ctx.today);
    let issues = schema.validate(&normalized, &full);
    if !issues.is_empty() {
        tracing::debug!(%step, issues = issues.len(), "step draft failed validation");
        return Err(StepValidationError::Invalid { step, issues });
    }

    engine::fill_defaults(schema.fields(), &mut normalized);
    Ok(mapper::to_canonical(step, &Value::Object(normalized))?)
}
