use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

/// A step document as it arrives from the rendering layer.
pub type Document = Map<String, Value>;

/// A cross-field rule run after the per-field pass, in full mode only.
pub type CrossCheck = fn(&Document, &ValidationContext, &mut Vec<ValidationIssue>);

/// One failed rule, addressed by the path of the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationIssue {
    pub path: Vec<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: &[&str], message: impl Into<String>) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
            message: message.into(),
        }
    }

    pub fn at(path: &[String], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }

    /// Prefix the path, e.g. with the step id when aggregating steps.
    pub fn nested_under(mut self, segment: &str) -> Self {
        self.path.insert(0, segment.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ValidationMode {
    /// Everything enforced, including required fields and cross-field rules.
    Full,
    /// Live feedback while editing: absent fields are fine, present fields
    /// must still be well-formed.
    Partial,
    /// Full rules over a record that was already accepted, minus the ones
    /// that only hold on the day it was entered.
    Recheck,
}

/// Everything a validator may depend on besides the draft itself. Passing
/// `today` explicitly keeps validation deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub mode: ValidationMode,
    pub today: jiff::civil::Date,
}

impl ValidationContext {
    pub fn full(today: jiff::civil::Date) -> Self {
        Self {
            mode: ValidationMode::Full,
            today,
        }
    }

    pub fn partial(today: jiff::civil::Date) -> Self {
        Self {
            mode: ValidationMode::Partial,
            today,
        }
    }

    pub fn recheck(today: jiff::civil::Date) -> Self {
        Self {
            mode: ValidationMode::Recheck,
            today,
        }
    }

    /// Full mode as of the local calendar date.
    pub fn full_today() -> Self {
        Self::full(jiff::Zoned::now().date())
    }

    /// Required fields and cross-field rules apply.
    pub fn is_full(&self) -> bool {
        matches!(self.mode, ValidationMode::Full | ValidationMode::Recheck)
    }

    pub fn is_recheck(&self) -> bool {
        self.mode == ValidationMode::Recheck
    }
}

/// A named predicate over the whole step document.
#[derive(Debug, Clone, Copy)]
pub struct Condition {
    pub description: &'static str,
    pub holds: fn(&Document) -> bool,
}

impl Condition {
    pub fn evaluate(&self, doc: &Document) -> bool {
        (self.holds)(doc)
    }

    /// True when `field` is the JSON boolean `true`.
    pub fn flag(doc: &Document, field: &str) -> bool {
        doc.get(field).and_then(Value::as_bool).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Presence {
    Required,
    Optional,
    RequiredWhen(Condition),
}

impl Presence {
    pub fn is_required(&self, root: &Document) -> bool {
        match self {
            Presence::Required => true,
            Presence::Optional => false,
            Presence::RequiredWhen(condition) => condition.evaluate(root),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Any,
    NotFuture,
    /// Not in the future and at most [`MAX_AGE_YEARS`] ago.
    Birth,
}

pub const MAX_AGE_YEARS: i16 = 130;

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Text { min: usize, max: usize },
    Name,
    Phone,
    Email,
    ZipCode,
    StateCode,
    Icd10,
    MemberId,
    Date(DateBound),
    Bool,
    /// A boolean that must be `true` on full validation.
    MustBeTrue,
    Integer { min: i64, max: i64 },
    OneOf(&'static [&'static str]),
    Object(&'static [FieldSpec]),
    List {
        item: &'static FieldKind,
        min: usize,
        max: usize,
    },
}

/// One row of a step's rule table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub presence: Presence,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            presence: Presence::Required,
            kind,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            presence: Presence::Optional,
            kind,
        }
    }

    pub const fn required_when(
        name: &'static str,
        label: &'static str,
        condition: Condition,
        kind: FieldKind,
    ) -> Self {
        Self {
            name,
            label,
            presence: Presence::RequiredWhen(condition),
            kind,
        }
    }
}
