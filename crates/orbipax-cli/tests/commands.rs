use std::sync::Arc;

use orbipax_cli::commands;
use orbipax_cli::config::{OrbipaxConfig, StorageConfig, load_config_from};
use orbipax_core::step::WizardStepId;
use orbipax_storage::file::FileStore;
use orbipax_storage::port::IntakeStore;
use serde_json::json;
use uuid::Uuid;

fn today() -> jiff::civil::Date {
    jiff::civil::date(2025, 6, 1)
}

#[test]
fn init_writes_file_storage_and_refuses_to_overwrite() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.json");
    let org = Uuid::new_v4();
    let root = dir.path().join("records");

    commands::init(&path, org, Some(root.clone()), false).expect("init");
    let config = load_config_from(&path).expect("load");
    assert_eq!(config.organization_id, org);
    assert_eq!(config.storage, StorageConfig::File { root: root.clone() });

    assert!(commands::init(&path, Uuid::new_v4(), Some(root.clone()), false).is_err());
    commands::init(&path, Uuid::new_v4(), Some(root), true).expect("forced init");
}

#[test]
fn steps_are_listed_in_order_with_optional_marks() {
    let config = OrbipaxConfig::new(Uuid::nil(), StorageConfig::Memory);
    let lines = commands::describe_steps(&config);
    assert_eq!(lines.len(), 10);
    assert!(lines[0].starts_with(" 1. welcome"));
    assert!(lines[4].ends_with("Medical Providers (optional)"));
    assert!(lines[9].ends_with("Review"));
}

#[test]
fn validate_reports_issues_in_both_modes() {
    let draft = json!({ "firstName": "Jane", "phone": "12" });
    let partial = commands::validate(WizardStepId::Demographics, &draft, true, today())
        .expect("validate");
    assert_eq!(partial.len(), 1);
    assert_eq!(partial[0].path, ["phone"]);

    let full = commands::validate(WizardStepId::Demographics, &draft, false, today())
        .expect("validate");
    assert!(full.len() > 1);

    let ok = commands::validate(WizardStepId::Welcome, &json!({ "acknowledged": true }), false, today())
        .expect("validate");
    assert!(ok.is_empty());
}

#[test]
fn validate_fails_on_non_object_drafts() {
    assert!(commands::validate(WizardStepId::Welcome, &json!([]), false, today()).is_err());
}

#[test]
fn read_draft_parses_json_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("welcome.json");
    std::fs::write(&path, r#"{ "acknowledged": true }"#).expect("write");
    assert_eq!(
        commands::read_draft(&path).expect("read"),
        json!({ "acknowledged": true })
    );
    assert!(commands::read_draft(&dir.path().join("missing.json")).is_err());
}

#[tokio::test]
async fn save_then_load_through_the_file_store() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (org, patient) = (Uuid::new_v4(), Uuid::new_v4());
    let store = FileStore::new(org, dir.path());

    let issues = commands::save(&store, patient, WizardStepId::Welcome, &json!({}), today())
        .await
        .expect("save");
    assert_eq!(issues.len(), 1);
    assert!(
        commands::load(&store, patient, WizardStepId::Welcome)
            .await
            .expect("load")
            .is_none()
    );

    let issues = commands::save(
        &store,
        patient,
        WizardStepId::Welcome,
        &json!({ "acknowledged": true }),
        today(),
    )
    .await
    .expect("save");
    assert!(issues.is_empty());
    let stored = commands::load(&store, patient, WizardStepId::Welcome)
        .await
        .expect("load")
        .expect("record");
    assert_eq!(stored.organization_id, org);
    assert_eq!(stored.data, json!({ "acknowledged": true }));
}

#[tokio::test]
async fn submit_reports_missing_steps() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = OrbipaxConfig::new(
        Uuid::new_v4(),
        StorageConfig::File {
            root: dir.path().to_path_buf(),
        },
    );
    let store: Arc<dyn IntakeStore> = commands::open_store(&config).await;
    let issues = commands::submit(&config, store, Uuid::new_v4(), today())
        .await
        .expect("submit");
    assert_eq!(issues.len(), 8);
    assert_eq!(issues[0].path, ["welcome"]);
}
