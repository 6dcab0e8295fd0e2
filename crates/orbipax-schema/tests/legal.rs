use orbipax_core::models::StepData;
use orbipax_core::models::legal::FormId;
use orbipax_core::step::WizardStepId;
use orbipax_schema::rules::{ValidationContext, ValidationIssue};
use orbipax_schema::schemas::legal::{FormRule, form_rule};
use orbipax_schema::{validate_document, validate_step};
use serde_json::{Value, json};

fn ctx() -> ValidationContext {
    ValidationContext::full(jiff::civil::date(2025, 6, 1))
}

fn issues(draft: Value) -> Vec<ValidationIssue> {
    validate_document(WizardStepId::LegalForms, &draft, &ctx()).expect("object draft")
}

fn has_issue(issues: &[ValidationIssue], path: &[&str]) -> bool {
    issues.iter().any(|i| i.path == path)
}

fn signed(name: &str) -> Value {
    json!({ "isRead": true, "signature": name })
}

fn signed_by_guardian(name: &str, guardian: &str) -> Value {
    json!({ "isRead": true, "signature": name, "guardianSignature": guardian })
}

fn adult_consents() -> Value {
    json!({
        "isMinor": false,
        "authorizedToShareWithPCP": false,
        "hipaa": signed("Jane Doe"),
        "consentTreatment": signed("Jane Doe"),
        "financial": signed("Jane Doe"),
    })
}

#[test]
fn complete_adult_consents_pass() {
    assert_eq!(issues(adult_consents()), vec![]);
}

#[test]
fn minor_signature_without_guardian_fails_at_guardian_path() {
    let found = issues(json!({
        "isMinor": true,
        "hipaa": { "isRead": true, "signature": "Jane Doe" }
    }));
    let guardian = found
        .iter()
        .find(|i| i.path == ["hipaa", "guardianSignature"])
        .expect("guardian issue");
    assert!(guardian.message.contains("Guardian signature is required"));
}

#[test]
fn minor_with_valid_guardian_signatures_passes() {
    let draft = json!({
        "isMinor": true,
        "hipaa": signed_by_guardian("Timmy Doe", "Jane Doe"),
        "consentTreatment": signed_by_guardian("Timmy Doe", "Jane Doe"),
        "financial": signed_by_guardian("Timmy Doe", "Jane Doe"),
    });
    assert_eq!(issues(draft), vec![]);
}

#[test]
fn malformed_guardian_signature_fails_name_validation() {
    let mut draft = adult_consents();
    draft["isMinor"] = json!(true);
    draft["hipaa"] = signed_by_guardian("Timmy Doe", "J4ne D0e");
    draft["consentTreatment"] = signed_by_guardian("Timmy Doe", "Jane Doe");
    draft["financial"] = signed_by_guardian("Timmy Doe", "Jane Doe");
    let found = issues(draft);
    assert_eq!(found.len(), 1, "{found:?}");
    assert_eq!(found[0].path, ["hipaa", "guardianSignature"]);
}

#[test]
fn pcp_authorization_makes_roi_required() {
    let mut draft = adult_consents();
    draft["authorizedToShareWithPCP"] = json!(true);
    draft["roi"] = json!({ "isRead": false });
    let found = issues(draft);
    assert!(has_issue(&found, &["roi", "isRead"]));
    assert!(has_issue(&found, &["roi", "signature"]));
}

#[test]
fn pcp_authorization_with_missing_roi_reports_roi_fields() {
    let mut draft = adult_consents();
    draft["authorizedToShareWithPCP"] = json!(true);
    let found = issues(draft);
    assert!(has_issue(&found, &["roi", "isRead"]));
    assert!(has_issue(&found, &["roi", "signature"]));
}

#[test]
fn minor_roi_needs_guardian_when_pcp_authorized() {
    let draft = json!({
        "isMinor": true,
        "authorizedToShareWithPCP": true,
        "hipaa": signed_by_guardian("Timmy Doe", "Jane Doe"),
        "consentTreatment": signed_by_guardian("Timmy Doe", "Jane Doe"),
        "financial": signed_by_guardian("Timmy Doe", "Jane Doe"),
        "roi": signed("Timmy Doe"),
    });
    let found = issues(draft);
    assert_eq!(found, vec![ValidationIssue::new(
        &["roi", "guardianSignature"],
        "Guardian signature is required for minors"
    )]);
}

#[test]
fn roi_is_optional_without_pcp_authorization() {
    assert!(!has_issue(&issues(adult_consents()), &["roi", "isRead"]));
    assert!(matches!(form_rule(FormId::Roi), FormRule::OptionalUnless(_)));
    assert!(matches!(form_rule(FormId::Hipaa), FormRule::Required));
}

#[test]
fn required_form_must_be_read() {
    let mut draft = adult_consents();
    draft["financial"] = json!({ "isRead": false, "signature": "Jane Doe" });
    let found = issues(draft);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path, ["financial", "isRead"]);
}

#[test]
fn future_signature_dates_are_rejected() {
    let mut draft = adult_consents();
    draft["hipaa"]["signatureDate"] = json!("2025-06-02");
    assert!(has_issue(&issues(draft), &["hipaa", "signatureDate"]));
}

#[test]
fn validate_step_stamps_required_flags_from_the_rule_table() {
    let mut draft = adult_consents();
    draft["authorizedToShareWithPCP"] = json!(true);
    draft["roi"] = signed("jane doe");
    draft["hipaa"]["isRequired"] = json!(false);

    let data = validate_step(WizardStepId::LegalForms, &draft, &ctx()).expect("valid");
    let StepData::LegalForms(legal) = data else {
        panic!("expected legal forms");
    };
    assert!(legal.hipaa.is_required);
    assert!(legal.roi.is_required);
    assert!(!legal.telehealth.is_required);
    assert_eq!(legal.roi.signature, "Jane Doe");
}

#[test]
fn identical_input_gives_identical_output() {
    let draft = json!({ "isMinor": true, "hipaa": { "isRead": true, "signature": "Jane Doe" } });
    assert_eq!(issues(draft.clone()), issues(draft));
}
