use orbipax_core::step::{StepConfig, WizardStepId, default_steps};
use orbipax_wizard::error::NavigatorError;
use orbipax_wizard::navigator::{StepStatus, WizardNavigator};

#[test]
fn starts_on_the_first_step() {
    let nav = WizardNavigator::default();
    assert_eq!(nav.current_step(), WizardStepId::Welcome);
    assert_eq!(nav.steps().len(), 10);
    assert!(nav.progress().visited_steps.contains(&WizardStepId::Welcome));
    assert!(nav.progress().completed_steps.is_empty());
    assert!(!nav.can_go_back());
    assert!(!nav.can_advance());
}

#[test]
fn progress_runs_from_ten_to_one_hundred_percent() {
    let mut nav = WizardNavigator::default();
    assert_eq!(nav.progress_percentage(), 10.0);
    nav.set_allow_skip_ahead(true);
    assert!(nav.go_to_step(WizardStepId::Review));
    assert_eq!(nav.progress_percentage(), 100.0);
    assert!(nav.is_last_step());
}

#[test]
fn boundaries_are_no_ops() {
    let mut nav = WizardNavigator::default();
    nav.set_allow_skip_ahead(true);
    assert!(!nav.prev_step());
    assert_eq!(nav.current_step(), WizardStepId::Welcome);

    assert!(nav.go_to_step(WizardStepId::Review));
    let before = nav.progress().clone();
    assert!(!nav.next_step());
    assert_eq!(nav.progress(), &before);
}

#[test]
fn unconfigured_steps_cannot_be_reached() {
    let mut nav = WizardNavigator::new(vec![
        StepConfig::required(WizardStepId::Welcome),
        StepConfig::required(WizardStepId::Review),
    ])
    .expect("valid step list");
    nav.set_allow_skip_ahead(true);
    let before = nav.progress().clone();
    assert!(!nav.go_to_step(WizardStepId::Insurance));
    assert_eq!(nav.progress(), &before);
    assert_eq!(nav.step_status(WizardStepId::Insurance), StepStatus::Unavailable);
    assert!(!nav.is_optional(WizardStepId::Insurance));
}

#[test]
fn step_lists_must_be_non_empty_and_unique() {
    assert!(matches!(WizardNavigator::new(vec![]), Err(NavigatorError::Empty)));
    let err = WizardNavigator::new(vec![
        StepConfig::required(WizardStepId::Welcome),
        StepConfig::optional(WizardStepId::Welcome),
    ])
    .expect_err("duplicate");
    assert!(matches!(err, NavigatorError::DuplicateStep(WizardStepId::Welcome)));
}

#[test]
fn round_trip_through_an_optional_step() {
    let mut nav = WizardNavigator::default();
    nav.set_allow_skip_ahead(true);
    assert!(nav.go_to_step(WizardStepId::MedicalProviders));
    assert!(nav.is_optional(WizardStepId::MedicalProviders));
    assert!(nav.next_step());
    assert_eq!(nav.current_step(), WizardStepId::Medications);
    assert!(nav.prev_step());
    assert_eq!(nav.current_step(), WizardStepId::MedicalProviders);
}

#[test]
fn advancing_is_gated_by_validity() {
    let mut nav = WizardNavigator::default();
    assert!(!nav.next_step());
    assert!(!nav.go_to_step(WizardStepId::Insurance));
    assert_eq!(nav.current_step(), WizardStepId::Welcome);

    nav.set_current_step_valid(true);
    assert!(nav.next_step());
    assert_eq!(nav.current_step(), WizardStepId::Demographics);
    assert_eq!(nav.step_status(WizardStepId::Welcome), StepStatus::Completed);
    assert_eq!(nav.step_status(WizardStepId::Demographics), StepStatus::Current);
    assert_eq!(nav.step_status(WizardStepId::Insurance), StepStatus::Upcoming);
    assert!(!nav.progress().is_current_step_valid);
}

#[test]
fn validity_follows_completion_when_moving() {
    let mut nav = WizardNavigator::default();
    nav.set_current_step_valid(true);
    assert!(nav.next_step());
    assert!(nav.prev_step());
    assert!(nav.progress().is_current_step_valid);

    // Visited steps stay reachable even when the current step is invalid.
    nav.set_current_step_valid(false);
    assert!(nav.go_to_step(WizardStepId::Demographics));
    assert_eq!(nav.step_status(WizardStepId::Welcome), StepStatus::Completed);
    assert!(nav.go_to_step(WizardStepId::Welcome));
    assert_eq!(nav.step_status(WizardStepId::Demographics), StepStatus::Visited);
}

#[test]
fn skipped_steps_are_not_completed() {
    let mut nav = WizardNavigator::default();
    nav.set_allow_skip_ahead(true);
    assert!(nav.next_step());
    assert_eq!(nav.step_status(WizardStepId::Welcome), StepStatus::Visited);
}

#[test]
fn reset_returns_to_the_start_but_keeps_skip_setting() {
    let mut nav = WizardNavigator::default();
    nav.set_allow_skip_ahead(true);
    nav.mark_completed(WizardStepId::Welcome);
    assert!(nav.go_to_step(WizardStepId::Goals));
    nav.reset();
    assert_eq!(nav.current_step(), WizardStepId::Welcome);
    assert!(nav.progress().completed_steps.is_empty());
    assert_eq!(nav.progress().visited_steps.len(), 1);
    assert!(nav.progress().allow_skip_ahead);
}

#[test]
fn default_navigator_uses_the_default_step_list() {
    assert_eq!(WizardNavigator::default().steps(), default_steps().as_slice());
}
