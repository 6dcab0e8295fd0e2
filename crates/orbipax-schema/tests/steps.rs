use orbipax_core::mapper::{to_canonical, to_storage};
use orbipax_core::models::StepData;
use orbipax_core::models::demographics::Gender;
use orbipax_core::step::WizardStepId;
use orbipax_schema::rules::{ValidationContext, ValidationIssue};
use orbipax_schema::{get_schema, validate_document, validate_step};
use serde_json::{Value, json};

fn ctx() -> ValidationContext {
    ValidationContext::full(jiff::civil::date(2025, 6, 1))
}

fn issues(step: WizardStepId, draft: Value) -> Vec<ValidationIssue> {
    validate_document(step, &draft, &ctx()).expect("object draft")
}

fn paths(issues: &[ValidationIssue]) -> Vec<String> {
    issues.iter().map(|i| i.path.join(".")).collect()
}

fn demographics() -> Value {
    json!({
        "firstName": "  jane ",
        "lastName": "DOE",
        "dateOfBirth": "1990-04-12",
        "gender": "female",
        "email": " Jane@Example.org ",
        "phone": "555.234.5678",
        "address": { "street1": "12 Main St", "city": "Portland", "state": "or", "zipCode": "97201" }
    })
}

#[test]
fn every_step_has_a_schema_for_itself() {
    for step in WizardStepId::ALL {
        assert_eq!(get_schema(step).step(), step);
    }
}

#[test]
fn demographics_are_normalized_into_canonical_form() {
    let data = validate_step(WizardStepId::Demographics, &demographics(), &ctx()).expect("valid");
    let StepData::Demographics(d) = data else {
        panic!("expected demographics");
    };
    assert_eq!(d.first_name, "Jane");
    assert_eq!(d.last_name, "Doe");
    assert_eq!(d.phone, "(555) 234-5678");
    assert_eq!(d.email.as_deref(), Some("jane@example.org"));
    assert_eq!(d.address.state, "OR");
    assert_eq!(d.gender, Gender::Female);
    assert_eq!(d.age_on(jiff::civil::date(2025, 4, 11)), 34);
    assert_eq!(d.age_on(jiff::civil::date(2025, 4, 12)), 35);
}

#[test]
fn demographics_reject_future_and_ancient_birth_dates() {
    let mut draft = demographics();
    draft["dateOfBirth"] = json!("2025-06-02");
    assert_eq!(paths(&issues(WizardStepId::Demographics, draft.clone())), ["dateOfBirth"]);

    draft["dateOfBirth"] = json!("1880-01-01");
    assert_eq!(paths(&issues(WizardStepId::Demographics, draft.clone())), ["dateOfBirth"]);

    draft["dateOfBirth"] = json!("04/12/1990");
    assert_eq!(paths(&issues(WizardStepId::Demographics, draft)), ["dateOfBirth"]);
}

#[test]
fn emergency_contact_needs_a_different_phone() {
    let mut draft = demographics();
    draft["emergencyContact"] =
        json!({ "name": "John Doe", "relationship": "Spouse", "phone": "(555) 234-5678" });
    assert_eq!(
        paths(&issues(WizardStepId::Demographics, draft)),
        ["emergencyContact.phone"]
    );
}

#[test]
fn insured_clients_need_a_coverage() {
    assert_eq!(
        paths(&issues(WizardStepId::Insurance, json!({ "hasInsurance": true }))),
        ["coverages"]
    );
    assert_eq!(
        paths(&issues(WizardStepId::Insurance, json!({ "hasInsurance": true, "coverages": [] }))),
        ["coverages"]
    );
    assert!(issues(WizardStepId::Insurance, json!({ "hasInsurance": false })).is_empty());
}

#[test]
fn insurance_cross_field_rules() {
    let coverage = json!({
        "carrier": "Acme Health",
        "memberId": "AC-1234",
        "subscriberName": "Jane Doe",
        "relationshipToSubscriber": "self",
        "effectiveDate": "2024-01-01",
        "expirationDate": "2023-12-31",
        "isPrimary": true
    });
    let found = issues(
        WizardStepId::Insurance,
        json!({ "hasInsurance": true, "coverages": [coverage.clone(), coverage] }),
    );
    assert_eq!(
        paths(&found),
        [
            "coverages.1.isPrimary",
            "coverages.0.expirationDate",
            "coverages.1.expirationDate"
        ]
    );
}

#[test]
fn prior_treatment_details_are_conditionally_required() {
    let base = json!({
        "presentingProblem": "Persistent low mood for six months",
        "hasPriorTreatment": true
    });
    assert_eq!(
        paths(&issues(WizardStepId::Diagnoses, base.clone())),
        ["priorTreatmentDetails"]
    );

    let mut without = base;
    without["hasPriorTreatment"] = json!(false);
    assert!(issues(WizardStepId::Diagnoses, without).is_empty());
}

#[test]
fn diagnoses_allow_one_primary_and_unique_codes() {
    let found = issues(
        WizardStepId::Diagnoses,
        json!({
            "presentingProblem": "Panic attacks at work",
            "hasPriorTreatment": false,
            "diagnoses": [
                { "code": "F41.0", "description": "Panic disorder", "isPrimary": true },
                { "code": "f41.0", "description": "Panic disorder", "isPrimary": true },
                { "code": "41", "description": "Bad code" }
            ]
        }),
    );
    assert_eq!(
        paths(&found),
        ["diagnoses.2.code", "diagnoses.1.isPrimary", "diagnoses.1.code"]
    );
}

#[test]
fn pcp_details_required_when_client_has_one() {
    let found = issues(WizardStepId::MedicalProviders, json!({ "hasPcp": true }));
    assert_eq!(paths(&found), ["pcp"]);

    let found = issues(
        WizardStepId::MedicalProviders,
        json!({ "hasPcp": true, "pcp": { "name": "Dr. Ann Lee" } }),
    );
    assert_eq!(paths(&found), ["pcp.phone"]);
}

#[test]
fn medication_list_must_match_the_answer() {
    let med = json!({ "name": "Sertraline", "dosage": "50 mg", "frequency": "daily", "route": "oral" });
    assert_eq!(
        paths(&issues(WizardStepId::Medications, json!({ "hasMedications": "yes" }))),
        ["medications"]
    );
    assert_eq!(
        paths(&issues(
            WizardStepId::Medications,
            json!({ "hasMedications": "no", "medications": [med.clone()] })
        )),
        ["medications"]
    );
    assert!(
        issues(
            WizardStepId::Medications,
            json!({ "hasMedications": "yes", "medications": [med] })
        )
        .is_empty()
    );
}

#[test]
fn self_referrals_do_not_need_a_referrer() {
    let draft = json!({
        "referralSource": "self",
        "reason": "Wants help with anxiety",
        "requestedServices": ["individual therapy"]
    });
    assert!(issues(WizardStepId::Referrals, draft.clone()).is_empty());

    let mut from_pcp = draft;
    from_pcp["referralSource"] = json!("pcp");
    assert_eq!(paths(&issues(WizardStepId::Referrals, from_pcp)), ["referrerName"]);
}

#[test]
fn goals_need_at_least_one_entry_and_future_targets() {
    assert_eq!(
        paths(&issues(WizardStepId::Goals, json!({ "goals": [] }))),
        ["goals"]
    );
    let found = issues(
        WizardStepId::Goals,
        json!({ "goals": [{ "description": "Sleep through the night", "priority": "high", "targetDate": "2025-01-01" }] }),
    );
    assert_eq!(paths(&found), ["goals.0.targetDate"]);
}

#[test]
fn welcome_and_review_must_be_confirmed() {
    assert_eq!(
        paths(&issues(WizardStepId::Welcome, json!({ "acknowledged": false }))),
        ["acknowledged"]
    );
    assert_eq!(
        paths(&issues(WizardStepId::Review, json!({ "confirmedAccuracy": false }))),
        ["confirmedAccuracy"]
    );
    assert!(issues(WizardStepId::Review, json!({ "confirmedAccuracy": true })).is_empty());
}

#[test]
fn invalid_drafts_return_their_issues() {
    let err = validate_step(WizardStepId::Welcome, &json!({}), &ctx()).expect_err("invalid");
    assert_eq!(err.issues().len(), 1);
    assert_eq!(err.issues()[0].path, ["acknowledged"]);
}

#[test]
fn validated_drafts_are_completed_to_the_storage_shape() {
    let data = validate_step(
        WizardStepId::Welcome,
        &json!({ "acknowledged": true, "extra": 1 }),
        &ctx(),
    )
    .expect("unknown keys are dropped");
    assert_eq!(to_storage(&data).expect("encode"), json!({ "acknowledged": true }));

    let data = validate_step(WizardStepId::Insurance, &json!({ "hasInsurance": false }), &ctx())
        .expect("valid");
    let stored = to_storage(&data).expect("encode");
    assert_eq!(stored, json!({ "hasInsurance": false, "coverages": [] }));
    assert_eq!(to_canonical(WizardStepId::Insurance, &stored).expect("map"), data);
}
