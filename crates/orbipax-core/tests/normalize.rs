use orbipax_core::normalize::{
    MAX_NAME_LENGTH, normalize_name, normalize_phone_number, normalize_whitespace,
    validate_email, validate_icd10_code, validate_member_id, validate_name,
    validate_phone_number, validate_state_code, validate_zip_code,
};

#[test]
fn name_whitespace_is_collapsed() {
    assert_eq!(normalize_name("  Jane   Doe "), "Jane Doe");
    assert_eq!(normalize_whitespace("a \t b\n c"), "a b c");
}

#[test]
fn single_case_names_are_title_cased_per_segment() {
    assert_eq!(normalize_name("mary-jane o'neil"), "Mary-Jane O'Neil");
    assert_eq!(normalize_name("JOHN SMITH"), "John Smith");
}

#[test]
fn mixed_case_names_keep_their_casing() {
    assert_eq!(normalize_name("McDonald"), "McDonald");
    assert_eq!(normalize_name("van der Berg"), "van der Berg");
}

#[test]
fn validate_name_accepts_common_name_punctuation() {
    assert!(validate_name("Jane Doe"));
    assert!(validate_name("O'Brien-Smith Jr."));
    assert!(validate_name("José Núñez"));
}

#[test]
fn validate_name_rejects_digits_symbols_and_blank() {
    assert!(!validate_name(""));
    assert!(!validate_name("   "));
    assert!(!validate_name("Jane2"));
    assert!(!validate_name("Jane <script>"));
    assert!(!validate_name("-.'"));
}

#[test]
fn validate_name_enforces_max_length() {
    let at_limit = "a".repeat(MAX_NAME_LENGTH);
    let over = "a".repeat(MAX_NAME_LENGTH + 1);
    assert!(validate_name(&at_limit));
    assert!(!validate_name(&over));
}

#[test]
fn phone_numbers_are_canonicalized() {
    assert_eq!(normalize_phone_number("555-234-5678"), "(555) 234-5678");
    assert_eq!(normalize_phone_number("+1 (555) 234 5678"), "(555) 234-5678");
    assert_eq!(normalize_phone_number("5552345678"), "(555) 234-5678");
}

#[test]
fn unnormalizable_phone_numbers_pass_through_and_fail_validation() {
    let raw = normalize_phone_number(" 12345 ");
    assert_eq!(raw, "12345");
    assert!(!validate_phone_number(&raw));
}

#[test]
fn phone_validation_rejects_invalid_area_and_exchange_codes() {
    assert!(validate_phone_number("(555) 234-5678"));
    assert!(!validate_phone_number("(055) 234-5678"));
    assert!(!validate_phone_number("(555) 134-5678"));
    assert!(!validate_phone_number("555-234-5678"));
}

#[test]
fn format_validators() {
    assert!(validate_email("jane.doe@example.org"));
    assert!(!validate_email("jane.doe@"));
    assert!(validate_zip_code("97201"));
    assert!(validate_zip_code("97201-1234"));
    assert!(!validate_zip_code("9720"));
    assert!(validate_state_code("OR"));
    assert!(!validate_state_code("or"));
    assert!(!validate_state_code("XX"));
    assert!(validate_icd10_code("F41.1"));
    assert!(validate_icd10_code("F32.A"));
    assert!(validate_icd10_code("Z63"));
    assert!(!validate_icd10_code("U07.1"));
    assert!(!validate_icd10_code("41.1"));
    assert!(validate_member_id("ABC-123456"));
    assert!(!validate_member_id("-ABC"));
}
