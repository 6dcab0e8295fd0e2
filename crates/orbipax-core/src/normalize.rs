//! Field normalizers.
//!
//! Pure, total functions that canonicalize raw user input and check its
//! format. Invalid input never panics or errors here; it simply fails the
//! matching `validate_*` function and is reported upstream as a
//! validation issue.

use std::sync::LazyLock;

use regex::Regex;

/// Longest accepted personal name or signature, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([2-9]\d{2}\) [2-9]\d{2}-\d{4}$").expect("valid regex"));

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("valid regex")
});

static ZIP_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid regex"));

// Letter, two digits (second may be A/B for a few chapters), optional
// dotted extension of up to four characters.
static ICD10: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-TV-Z][0-9][0-9AB](\.[0-9A-TV-Z]{1,4})?$").expect("valid regex")
});

static MEMBER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9\-]{0,29}$").expect("valid regex"));

const STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "PR", "RI", "SC", "SD", "TN", "TX",
    "UT", "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Trim and collapse every whitespace run to a single space.
pub fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize a personal name.
///
/// Whitespace is collapsed. Input typed entirely in one case is title-cased
/// per segment (segments break on spaces, hyphens and apostrophes), so
/// `"mary-jane o'neil"` becomes `"Mary-Jane O'Neil"`. Mixed-case input is
/// left alone to preserve names like `"McDonald"`.
pub fn normalize_name(raw: &str) -> String {
    let collapsed = normalize_whitespace(raw);
    let has_lower = collapsed.chars().any(char::is_lowercase);
    let has_upper = collapsed.chars().any(char::is_uppercase);
    if has_lower && has_upper {
        return collapsed;
    }

    let mut out = String::with_capacity(collapsed.len());
    let mut at_segment_start = true;
    for c in collapsed.chars() {
        if at_segment_start {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        at_segment_start = matches!(c, ' ' | '-' | '\'' | '\u{2019}');
    }
    out
}

/// Letters, spaces, hyphens, apostrophes and periods, with at least one
/// letter and at most [`MAX_NAME_LENGTH`] characters.
pub fn validate_name(s: &str) -> bool {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_NAME_LENGTH {
        return false;
    }
    trimmed.chars().any(char::is_alphabetic)
        && trimmed
            .chars()
            .all(|c| c.is_alphabetic() || matches!(c, ' ' | '-' | '\'' | '\u{2019}' | '.'))
}

/// Canonicalize a US phone number to `(XXX) XXX-XXXX`.
///
/// Ten digits, or eleven with a leading country code `1`, are reformatted.
/// Anything else comes back trimmed but otherwise untouched so that
/// [`validate_phone_number`] rejects it.
pub fn normalize_phone_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let national = match digits.len() {
        10 => digits.as_str(),
        11 if digits.starts_with('1') => &digits[1..],
        _ => return raw.trim().to_string(),
    };
    format!(
        "({}) {}-{}",
        &national[0..3],
        &national[3..6],
        &national[6..10]
    )
}

/// Accepts the canonical `(NXX) NXX-XXXX` form, where N is 2-9.
pub fn validate_phone_number(s: &str) -> bool {
    PHONE.is_match(s)
}

pub fn validate_email(s: &str) -> bool {
    s.len() <= 254 && EMAIL.is_match(s)
}

/// Five-digit ZIP or ZIP+4.
pub fn validate_zip_code(s: &str) -> bool {
    ZIP_CODE.is_match(s)
}

/// Two-letter USPS state or territory code, upper case.
pub fn validate_state_code(s: &str) -> bool {
    STATE_CODES.contains(&s)
}

/// ICD-10-CM code shape (e.g. `F41.1`, `F32.A`). Format only; the code is
/// not looked up in any code set.
pub fn validate_icd10_code(s: &str) -> bool {
    ICD10.is_match(s)
}

/// Insurance member identifier: alphanumeric with dashes, 1-30 characters.
pub fn validate_member_id(s: &str) -> bool {
    MEMBER_ID.is_match(s)
}
