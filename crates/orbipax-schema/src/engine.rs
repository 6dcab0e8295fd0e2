//! The table-driven validation engine shared by every step.

use orbipax_core::normalize;
use serde_json::Value;

use crate::rules::{
    DateBound, Document, FieldKind, FieldSpec, MAX_AGE_YEARS, ValidationContext, ValidationIssue,
};

/// Missing, `null`, and whitespace-only strings all count as absent.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// The value of `field`, unless it is absent.
pub fn present<'a>(doc: &'a Document, field: &str) -> Option<&'a Value> {
    doc.get(field).filter(|v| !is_blank(v))
}

/// Run the per-field pass of `fields` over `obj`. `root` is the whole step
/// document, against which conditional requirements are evaluated.
pub fn check_fields(
    fields: &[FieldSpec],
    obj: &Document,
    root: &Document,
    path: &mut Vec<String>,
    ctx: &ValidationContext,
    issues: &mut Vec<ValidationIssue>,
) {
    for spec in fields {
        path.push(spec.name.to_string());
        match present(obj, spec.name) {
            None => {
                if ctx.is_full() && spec.presence.is_required(root) {
                    issues.push(ValidationIssue::at(path, format!("{} is required", spec.label)));
                }
            }
            Some(value) => check_value(&spec.kind, spec.label, value, root, path, ctx, issues),
        }
        path.pop();
    }
}

fn check_value(
    kind: &FieldKind,
    label: &str,
    value: &Value,
    root: &Document,
    path: &mut Vec<String>,
    ctx: &ValidationContext,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut fail = |message: String| issues.push(ValidationIssue::at(path, message));

    match kind {
        FieldKind::Bool | FieldKind::MustBeTrue => match value.as_bool() {
            None => fail(format!("{label} must be true or false")),
            Some(false) if matches!(kind, FieldKind::MustBeTrue) && ctx.is_full() => {
                fail(format!("{label} must be confirmed"))
            }
            Some(_) => {}
        },
        FieldKind::Integer { min, max } => match value.as_i64() {
            Some(n) if (*min..=*max).contains(&n) => {}
            _ => fail(format!("{label} must be a whole number from {min} to {max}")),
        },
        FieldKind::Object(fields) => match value.as_object() {
            Some(obj) => check_fields(fields, obj, root, path, ctx, issues),
            None => fail(format!("{label} is malformed")),
        },
        FieldKind::List { item, min, max } => {
            let Some(items) = value.as_array() else {
                fail(format!("{label} must be a list"));
                return;
            };
            if ctx.is_full() && items.len() < *min {
                fail(format!("{label} must have at least {min} entr{}", plural(*min)));
            }
            if items.len() > *max {
                fail(format!("{label} can have at most {max} entr{}", plural(*max)));
            }
            for (index, entry) in items.iter().enumerate() {
                path.push(index.to_string());
                if is_blank(entry) {
                    if ctx.is_full() {
                        issues.push(ValidationIssue::at(path, format!("{label} entry is empty")));
                    }
                } else {
                    check_value(item, label, entry, root, path, ctx, issues);
                }
                path.pop();
            }
        }
        _ => {
            let Some(s) = value.as_str() else {
                fail(format!("{label} must be text"));
                return;
            };
            if let Some(message) = check_text(kind, label, s.trim(), ctx) {
                fail(message);
            }
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "y" } else { "ies" }
}

/// Format check for the string-valued kinds.
fn check_text(kind: &FieldKind, label: &str, s: &str, ctx: &ValidationContext) -> Option<String> {
    match kind {
        FieldKind::Text { min, max } => {
            let len = s.chars().count();
            if len < *min {
                Some(format!("{label} must be at least {min} characters"))
            } else if len > *max {
                Some(format!("{label} must be at most {max} characters"))
            } else {
                None
            }
        }
        FieldKind::Name => (!normalize::validate_name(&normalize::normalize_name(s))).then(|| {
            format!(
                "{label} may only contain letters, spaces, hyphens, apostrophes, and periods (max {} characters)",
                normalize::MAX_NAME_LENGTH
            )
        }),
        FieldKind::Phone => (!normalize::validate_phone_number(&normalize::normalize_phone_number(
            s,
        )))
        .then(|| format!("{label} must be a valid US phone number")),
        FieldKind::Email => {
            (!normalize::validate_email(s)).then(|| format!("{label} must be a valid email address"))
        }
        FieldKind::ZipCode => (!normalize::validate_zip_code(s))
            .then(|| format!("{label} must be a 5-digit ZIP code or ZIP+4")),
        FieldKind::StateCode => (!normalize::validate_state_code(&s.to_uppercase()))
            .then(|| format!("{label} must be a two-letter US state code")),
        FieldKind::Icd10 => (!normalize::validate_icd10_code(&s.to_uppercase()))
            .then(|| format!("{label} must be a valid ICD-10 code (e.g. F41.1)")),
        FieldKind::MemberId => (!normalize::validate_member_id(s))
            .then(|| format!("{label} may only contain letters, digits, and dashes (max 30)")),
        FieldKind::OneOf(allowed) => (!allowed.contains(&s))
            .then(|| format!("{label} must be one of: {}", allowed.join(", "))),
        FieldKind::Date(bound) => check_date(*bound, label, s, ctx),
        FieldKind::Bool
        | FieldKind::MustBeTrue
        | FieldKind::Integer { .. }
        | FieldKind::Object(_)
        | FieldKind::List { .. } => None,
    }
}

/// Strict `YYYY-MM-DD`, then calendar validity, then the bound.
pub fn parse_date(s: &str) -> Option<jiff::civil::Date> {
    let b = s.as_bytes();
    let shape_ok = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !shape_ok {
        return None;
    }
    s.parse().ok()
}

fn check_date(bound: DateBound, label: &str, s: &str, ctx: &ValidationContext) -> Option<String> {
    let Some(date) = parse_date(s) else {
        return Some(format!("{label} must be a valid date (YYYY-MM-DD)"));
    };
    match bound {
        DateBound::Any => None,
        DateBound::NotFuture | DateBound::Birth if date > ctx.today => {
            Some(format!("{label} cannot be in the future"))
        }
        DateBound::Birth if ctx.today.year() - date.year() > MAX_AGE_YEARS => {
            Some(format!("{label} must be within the last {MAX_AGE_YEARS} years"))
        }
        DateBound::NotFuture | DateBound::Birth => None,
    }
}

/// Canonicalize a draft in place according to its rule table: keys outside
/// the table and blank values are dropped, names and phone numbers are
/// normalized, codes upper-cased, everything else trimmed.
pub fn normalize_fields(fields: &[FieldSpec], obj: &mut Document) {
    obj.retain(|key, _| fields.iter().any(|spec| spec.name == key.as_str()));
    for spec in fields {
        let Some(value) = obj.get_mut(spec.name) else {
            continue;
        };
        if is_blank(value) {
            obj.remove(spec.name);
            continue;
        }
        normalize_value(&spec.kind, value);
    }
}

fn normalize_value(kind: &FieldKind, value: &mut Value) {
    match (kind, value) {
        (FieldKind::Object(fields), Value::Object(obj)) => normalize_fields(fields, obj),
        (FieldKind::List { item, .. }, Value::Array(items)) => {
            items.retain(|v| !is_blank(v));
            for entry in items.iter_mut() {
                normalize_value(item, entry);
            }
        }
        (kind, Value::String(s)) => {
            let normalized = match kind {
                FieldKind::Name => normalize::normalize_name(s),
                FieldKind::Phone => normalize::normalize_phone_number(s),
                FieldKind::StateCode | FieldKind::Icd10 => s.trim().to_uppercase(),
                FieldKind::Email => s.trim().to_lowercase(),
                _ => s.trim().to_string(),
            };
            *s = normalized;
        }
        _ => {}
    }
}

/// Give every absent flag and list its empty value so the document has the
/// full storage shape. Only run on a document that passed full validation:
/// required fields are present by then.
pub fn fill_defaults(fields: &[FieldSpec], obj: &mut Document) {
    for spec in fields {
        if let Some(value) = obj.get_mut(spec.name) {
            fill_value(&spec.kind, value);
            continue;
        }
        let empty = match spec.kind {
            FieldKind::Bool | FieldKind::MustBeTrue => Value::Bool(false),
            FieldKind::List { .. } => Value::Array(Vec::new()),
            _ => continue,
        };
        obj.insert(spec.name.to_string(), empty);
    }
}

fn fill_value(kind: &FieldKind, value: &mut Value) {
    match (kind, value) {
        (FieldKind::Object(fields), Value::Object(obj)) => fill_defaults(fields, obj),
        (FieldKind::List { item, .. }, Value::Array(items)) => {
            for entry in items.iter_mut() {
                fill_value(item, entry);
            }
        }
        _ => {}
    }
}

/// Helpers for cross-field checks, which see the raw document.
pub mod lookup {
    use serde_json::Value;

    use super::present;
    use crate::rules::Document;

    /// Present string value of `field`, trimmed.
    pub fn text<'a>(doc: &'a Document, field: &str) -> Option<&'a str> {
        present(doc, field).and_then(Value::as_str).map(str::trim)
    }

    pub fn object<'a>(doc: &'a Document, field: &str) -> Option<&'a Document> {
        doc.get(field).and_then(Value::as_object)
    }

    /// `true` only for the JSON boolean `true`.
    pub fn is_true(doc: &Document, field: &str) -> bool {
        doc.get(field).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Object entries of a list field, with their indexes. Malformed entries
    /// are skipped; the per-field pass already reported them.
    pub fn entries<'a>(
        doc: &'a Document,
        field: &str,
    ) -> impl Iterator<Item = (usize, &'a Document)> + 'a {
        doc.get(field)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .enumerate()
            .filter_map(|(i, v)| v.as_object().map(|o| (i, o)))
    }

    /// Number of entries in a list field, if it is a list.
    pub fn len(doc: &Document, field: &str) -> Option<usize> {
        doc.get(field).and_then(Value::as_array).map(Vec::len)
    }
}
