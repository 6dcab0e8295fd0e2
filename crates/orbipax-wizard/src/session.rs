//! One wizard run for one patient.
//!
//! Saves are split into [`IntakeSession::begin_save`], [`PendingSave::commit`]
//! and [`IntakeSession::finish_save`] so a caller can keep navigating while a
//! save is awaited. The outcome is applied to the draft the save was started
//! from, whatever step is current by then. Edits made while the save was in
//! flight stay unsaved.
//!
//! Leaving a step discards its unsaved edits unless a save for it is in
//! flight.

use std::collections::BTreeMap;
use std::sync::Arc;

use orbipax_core::mapper;
use orbipax_core::models::StepRecord;
use orbipax_core::step::WizardStepId;
use orbipax_schema::rules::{Document, ValidationContext, ValidationIssue};
use orbipax_schema::submission::check_submission;
use orbipax_schema::{validate_map, validate_step};
use orbipax_storage::error::PersistenceError;
use orbipax_storage::port::IntakeStore;
use serde_json::Value;
use uuid::Uuid;

use crate::draft::DraftStore;
use crate::error::SessionError;
use crate::navigator::WizardNavigator;

/// A validated record on its way to the store.
#[derive(Debug, Clone)]
pub struct PendingSave {
    patient_id: Uuid,
    step: WizardStepId,
    record: StepRecord,
    revision: u64,
    today: jiff::civil::Date,
}

impl PendingSave {
    pub fn patient_id(&self) -> Uuid {
        self.patient_id
    }

    pub fn step(&self) -> WizardStepId {
        self.step
    }

    pub fn record(&self) -> &StepRecord {
        &self.record
    }

    /// Write the record. Never touches the session.
    pub async fn commit(self, store: Arc<dyn IntakeStore>) -> CompletedSave {
        let recorded_at = self.record.recorded_at();
        let result = store
            .save(self.patient_id, self.step, self.record, self.today)
            .await;
        CompletedSave {
            patient_id: self.patient_id,
            step: self.step,
            revision: self.revision,
            recorded_at,
            result,
        }
    }
}

/// The outcome of a [`PendingSave`], keyed by patient and step.
#[derive(Debug)]
pub struct CompletedSave {
    pub patient_id: Uuid,
    pub step: WizardStepId,
    /// Draft revision the record was built from.
    pub revision: u64,
    pub recorded_at: jiff::Timestamp,
    pub result: Result<(), PersistenceError>,
}

pub struct IntakeSession {
    organization_id: Uuid,
    patient_id: Uuid,
    store: Arc<dyn IntakeStore>,
    navigator: WizardNavigator,
    drafts: BTreeMap<WizardStepId, DraftStore>,
    today: Option<jiff::civil::Date>,
}

impl IntakeSession {
    pub fn new(store: Arc<dyn IntakeStore>, patient_id: Uuid, navigator: WizardNavigator) -> Self {
        let drafts = navigator
            .steps()
            .iter()
            .map(|config| (config.id, DraftStore::new(patient_id, config.id)))
            .collect();
        Self {
            organization_id: store.organization_id(),
            patient_id,
            store,
            navigator,
            drafts,
            today: None,
        }
    }

    /// Validate as of a fixed date instead of the local calendar date.
    pub fn with_today(mut self, today: jiff::civil::Date) -> Self {
        self.today = Some(today);
        self
    }

    fn full_context(&self) -> ValidationContext {
        match self.today {
            Some(today) => ValidationContext::full(today),
            None => ValidationContext::full_today(),
        }
    }

    pub fn organization_id(&self) -> Uuid {
        self.organization_id
    }

    pub fn patient_id(&self) -> Uuid {
        self.patient_id
    }

    pub fn navigator(&self) -> &WizardNavigator {
        &self.navigator
    }

    pub fn current_step(&self) -> WizardStepId {
        self.navigator.current_step()
    }

    pub fn store(&self) -> Arc<dyn IntakeStore> {
        Arc::clone(&self.store)
    }

    pub fn draft(&self, step: WizardStepId) -> Option<&DraftStore> {
        self.drafts.get(&step)
    }

    fn draft_mut(&mut self, step: WizardStepId) -> Result<&mut DraftStore, SessionError> {
        self.drafts
            .get_mut(&step)
            .ok_or(SessionError::UnknownStep { step })
    }

    /// Merge `patch` into the current step's draft and return live feedback.
    ///
    /// The current step's validity is recomputed with full validation; the
    /// returned issues come from partial validation so fields not yet filled
    /// in are not flagged.
    pub fn edit(&mut self, patch: Document) -> Result<Vec<ValidationIssue>, SessionError> {
        let step = self.current_step();
        let ctx = self.full_context();
        let draft = self.draft_mut(step)?;
        draft.set_partial(patch);
        let snapshot = draft.snapshot();

        let valid = validate_step(step, &snapshot, &ctx).is_ok();
        self.navigator.set_current_step_valid(valid);

        let partial = ValidationContext::partial(ctx.today);
        Ok(self
            .drafts
            .get(&step)
            .map(|draft| validate_map(step, draft.data(), &partial))
            .unwrap_or_default())
    }

    /// Fill a step's draft from the store. Returns whether a record existed.
    pub async fn load_step(&mut self, step: WizardStepId) -> Result<bool, SessionError> {
        self.draft_mut(step)?.begin_load();
        let result = self.store.load(self.patient_id, step).await;

        match result {
            Ok(Some(record)) => {
                let data = match mapper::to_storage(record.data()) {
                    Ok(Value::Object(data)) => data,
                    Ok(_) => Document::new(),
                    Err(e) => {
                        self.draft_mut(step)?.fail_load("The saved information could not be read.");
                        return Err(e.into());
                    }
                };
                self.draft_mut(step)?
                    .finish_load(Some(data), Some(record.recorded_at()));
                self.navigator.mark_completed(step);
                if step == self.current_step() {
                    self.navigator.set_current_step_valid(true);
                }
                Ok(true)
            }
            Ok(None) => {
                self.draft_mut(step)?.finish_load(None, None);
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(%step, code = %e.code(), error = %e, "failed to load step");
                self.draft_mut(step)?.fail_load(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Validate a step's draft and mark it as saving.
    ///
    /// A second save for the same step while one is in flight is rejected.
    pub fn begin_save(&mut self, step: WizardStepId) -> Result<PendingSave, SessionError> {
        let ctx = self.full_context();
        let (patient_id, organization_id) = (self.patient_id, self.organization_id);
        let draft = self.draft_mut(step)?;
        if draft.is_saving() {
            return Err(SessionError::SaveInFlight { step });
        }

        let data = validate_step(step, &draft.snapshot(), &ctx)?;
        let record = StepRecord::new(patient_id, organization_id, data, jiff::Timestamp::now());
        draft.begin_save();
        Ok(PendingSave {
            patient_id,
            step,
            record,
            revision: draft.revision(),
            today: ctx.today,
        })
    }

    /// Apply a save outcome to the draft it was started from.
    pub fn finish_save(&mut self, completed: CompletedSave) -> Result<(), SessionError> {
        if completed.patient_id != self.patient_id {
            return Err(SessionError::PatientMismatch {
                expected: self.patient_id,
                actual: completed.patient_id,
            });
        }
        let step = completed.step;
        match completed.result {
            Ok(()) => {
                let ctx = self.full_context();
                let draft = self.draft_mut(step)?;
                draft.finish_save(completed.revision, completed.recorded_at);
                let (dirty, snapshot) = (draft.is_dirty(), draft.snapshot());
                self.navigator.mark_completed(step);
                if step == self.current_step() {
                    let valid = validate_step(step, &snapshot, &ctx).is_ok();
                    self.navigator.set_current_step_valid(valid);
                }
                tracing::info!(%step, still_dirty = dirty, "step saved");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%step, code = %e.code(), error = %e, "failed to save step");
                self.draft_mut(step)?.fail_save(e.user_message());
                Err(e.into())
            }
        }
    }

    pub async fn save_step(&mut self, step: WizardStepId) -> Result<(), SessionError> {
        let pending = self.begin_save(step)?;
        let completed = pending.commit(self.store()).await;
        self.finish_save(completed)
    }

    /// Save the current step and move on. Returns whether the navigator
    /// advanced; on the last step the save happens but there is nowhere to go.
    pub async fn continue_step(&mut self) -> Result<bool, SessionError> {
        let leaving = self.current_step();
        self.save_step(leaving).await?;
        let moved = self.navigator.next_step();
        self.left_step(leaving);
        Ok(moved)
    }

    pub fn go_to_step(&mut self, step: WizardStepId) -> bool {
        let leaving = self.current_step();
        let moved = self.navigator.go_to_step(step);
        self.left_step(leaving);
        moved
    }

    pub fn prev_step(&mut self) -> bool {
        let leaving = self.current_step();
        let moved = self.navigator.prev_step();
        self.left_step(leaving);
        moved
    }

    /// Drop unsaved edits on `step` once the navigator is somewhere else.
    /// A draft with a save in flight is kept for the save's outcome.
    fn left_step(&mut self, step: WizardStepId) {
        if step == self.current_step() {
            return;
        }
        if let Some(draft) = self.drafts.get_mut(&step)
            && draft.is_dirty()
            && !draft.is_saving()
        {
            tracing::debug!(%step, "discarding unsaved edits");
            draft.reset();
        }
    }

    pub fn set_allow_skip_ahead(&mut self, allow: bool) {
        self.navigator.set_allow_skip_ahead(allow);
    }

    /// Load every configured step from the store and run the final
    /// submission check. An empty result means the intake can be submitted.
    pub async fn submit(&self) -> Result<Vec<ValidationIssue>, SessionError> {
        let mut records = BTreeMap::new();
        for config in self.navigator.steps() {
            if let Some(record) = self.store.load(self.patient_id, config.id).await? {
                records.insert(config.id, record);
            }
        }
        let issues = check_submission(self.navigator.steps(), &records, &self.full_context());
        tracing::info!(
            steps = records.len(),
            issues = issues.len(),
            "submission checked"
        );
        Ok(issues)
    }

    /// Start the intake over: first step, empty drafts.
    pub fn restart(&mut self) {
        self.navigator.reset();
        for draft in self.drafts.values_mut() {
            draft.reset();
        }
    }
}
