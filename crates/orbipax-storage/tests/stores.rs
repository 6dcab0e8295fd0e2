use std::sync::Arc;

use orbipax_core::models::{StepData, StepRecord, Welcome};
use orbipax_core::step::WizardStepId;
use orbipax_schema::rules::ValidationContext;
use orbipax_schema::validate_step;
use orbipax_storage::error::{ErrorCode, PersistenceError};
use orbipax_storage::file::FileStore;
use orbipax_storage::memory::MemoryStore;
use orbipax_storage::port::IntakeStore;
use serde_json::json;
use uuid::Uuid;

fn today() -> jiff::civil::Date {
    jiff::civil::date(2025, 6, 1)
}

fn recorded_at() -> jiff::Timestamp {
    jiff::Timestamp::from_second(1_750_000_000).expect("valid timestamp")
}

fn demographics_record(org: Uuid, patient: Uuid) -> StepRecord {
    let draft = json!({
        "firstName": "jane",
        "lastName": "doe",
        "dateOfBirth": "1990-04-12",
        "gender": "female",
        "phone": "5552345678",
        "address": { "street1": "12 Main St", "city": "Portland", "state": "OR", "zipCode": "97201" }
    });
    let data = validate_step(
        WizardStepId::Demographics,
        &draft,
        &ValidationContext::full(today()),
    )
    .expect("valid demographics");
    StepRecord::new(patient, org, data, recorded_at())
}

fn stores(org: Uuid, dir: &tempfile::TempDir) -> Vec<Arc<dyn IntakeStore>> {
    let memory: Arc<dyn IntakeStore> = Arc::new(MemoryStore::new(org));
    let file: Arc<dyn IntakeStore> = Arc::new(FileStore::new(org, dir.path()));
    vec![memory, file]
}

#[tokio::test]
async fn saved_records_load_back_unchanged() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (org, patient) = (Uuid::new_v4(), Uuid::new_v4());
    for store in stores(org, &dir) {
        assert_eq!(
            store.load(patient, WizardStepId::Demographics).await.expect("load"),
            None
        );
        let record = demographics_record(org, patient);
        store
            .save(patient, WizardStepId::Demographics, record.clone(), today())
            .await
            .expect("save");
        let loaded = store
            .load(patient, WizardStepId::Demographics)
            .await
            .expect("load")
            .expect("record present");
        assert_eq!(loaded, record);
    }
}

#[tokio::test]
async fn records_from_another_organization_are_refused() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (org, other, patient) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    for store in stores(org, &dir) {
        let err = store
            .save(patient, WizardStepId::Demographics, demographics_record(other, patient), today())
            .await
            .expect_err("foreign org");
        assert!(matches!(err, PersistenceError::NotMember { organization_id } if organization_id == other));
        assert_eq!(err.code(), ErrorCode::NotMember);
    }
}

#[tokio::test]
async fn records_must_match_their_key() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (org, patient) = (Uuid::new_v4(), Uuid::new_v4());
    for store in stores(org, &dir) {
        let record = demographics_record(org, patient);
        let err = store
            .save(patient, WizardStepId::Welcome, record.clone(), today())
            .await
            .expect_err("wrong step");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);

        let err = store
            .save(Uuid::new_v4(), WizardStepId::Demographics, record, today())
            .await
            .expect_err("wrong patient");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}

#[tokio::test]
async fn records_are_revalidated_before_writing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (org, patient) = (Uuid::new_v4(), Uuid::new_v4());
    for store in stores(org, &dir) {
        let unacknowledged = StepRecord::new(
            patient,
            org,
            StepData::Welcome(Welcome {
                acknowledged: false,
            }),
            recorded_at(),
        );
        let err = store
            .save(patient, WizardStepId::Welcome, unacknowledged, today())
            .await
            .expect_err("fails full validation");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(store.load(patient, WizardStepId::Welcome).await.expect("load"), None);
    }
}

#[tokio::test]
async fn revalidation_uses_the_date_the_draft_was_checked_on() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (org, patient) = (Uuid::new_v4(), Uuid::new_v4());
    let draft = json!({
        "goals": [{ "description": "Sleep through the night", "priority": "high", "targetDate": "2025-07-01" }]
    });
    let data = validate_step(WizardStepId::Goals, &draft, &ValidationContext::full(today()))
        .expect("target date ahead of today");
    for store in stores(org, &dir) {
        let record = StepRecord::new(patient, org, data.clone(), recorded_at());
        store
            .save(patient, WizardStepId::Goals, record.clone(), today())
            .await
            .expect("accepted as of the same day");

        let later = jiff::civil::date(2025, 8, 1);
        let err = store
            .save(patient, WizardStepId::Goals, record, later)
            .await
            .expect_err("target date has passed");
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }
}

#[tokio::test]
async fn file_store_writes_under_the_storage_key() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (org, patient) = (Uuid::new_v4(), Uuid::new_v4());
    let store = FileStore::new(org, dir.path());
    store
        .save(patient, WizardStepId::Demographics, demographics_record(org, patient), today())
        .await
        .expect("save");

    let expected = dir
        .path()
        .join(format!("intake/{org}/{patient}/demographics.json"));
    assert_eq!(store.path_for(patient, WizardStepId::Demographics), expected);
    let written: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&expected).expect("file written")).expect("json");
    assert_eq!(written["step"], "demographics");
    assert_eq!(written["data"]["phone"], "(555) 234-5678");
    assert!(!expected.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn corrupt_files_are_reported_not_hidden() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (org, patient) = (Uuid::new_v4(), Uuid::new_v4());
    let store = FileStore::new(org, dir.path());
    let path = store.path_for(patient, WizardStepId::Welcome);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(&path, b"{ not json").expect("write");

    let err = store
        .load(patient, WizardStepId::Welcome)
        .await
        .expect_err("corrupt");
    assert_eq!(err.code(), ErrorCode::Unknown);
    assert_eq!(err.user_message(), "Something went wrong. Please try again.");
}

#[tokio::test]
async fn memory_store_keeps_one_record_per_key() {
    let (org, patient) = (Uuid::new_v4(), Uuid::new_v4());
    let store = MemoryStore::new(org);
    assert!(store.is_empty().await);
    for _ in 0..2 {
        store
            .save(patient, WizardStepId::Demographics, demographics_record(org, patient), today())
            .await
            .expect("save");
    }
    assert_eq!(store.len().await, 1);
}

#[test]
fn user_messages_never_echo_details() {
    let err = PersistenceError::ValidationFailed("firstName: Jane".to_string());
    assert!(!err.user_message().contains("Jane"));
    assert_eq!(
        serde_json::to_value(err.code()).expect("serialize"),
        json!("validation_failed")
    );
}
