use orbipax_core::step::WizardStepId;

use crate::StepSchema;
use crate::engine::{lookup, parse_date};
use crate::rules::{
    CrossCheck, DateBound, Document, FieldKind, FieldSpec, ValidationContext, ValidationIssue,
};

pub struct GoalsSchema;

pub const PRIORITIES: &[&str] = &["low", "medium", "high"];
pub const MAX_GOALS: usize = 10;

const GOAL_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("description", "Goal", FieldKind::Text { min: 5, max: 500 }),
    FieldSpec::required("priority", "Priority", FieldKind::OneOf(PRIORITIES)),
    FieldSpec::optional("targetDate", "Target date", FieldKind::Date(DateBound::Any)),
];

const GOAL: FieldKind = FieldKind::Object(GOAL_FIELDS);

const FIELDS: &[FieldSpec] = &[
    FieldSpec::required(
        "goals",
        "Treatment goals",
        FieldKind::List {
            item: &GOAL,
            min: 1,
            max: MAX_GOALS,
        },
    ),
    FieldSpec::optional(
        "motivationLevel",
        "Motivation level",
        FieldKind::Integer { min: 1, max: 10 },
    ),
];

/// Only enforced while the goal is entered; a stored goal whose target date
/// has since passed stays valid.
fn target_dates_ahead(doc: &Document, ctx: &ValidationContext, issues: &mut Vec<ValidationIssue>) {
    if ctx.is_recheck() {
        return;
    }
    for (index, goal) in lookup::entries(doc, "goals") {
        if let Some(target) = lookup::text(goal, "targetDate").and_then(parse_date)
            && target < ctx.today
        {
            issues.push(ValidationIssue::new(
                &["goals", &index.to_string(), "targetDate"],
                "Target date cannot be in the past",
            ));
        }
    }
}

const CHECKS: &[CrossCheck] = &[target_dates_ahead];

impl StepSchema for GoalsSchema {
    fn step(&self) -> WizardStepId {
        WizardStepId::Goals
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn checks(&self) -> &'static [CrossCheck] {
        CHECKS
    }
}
