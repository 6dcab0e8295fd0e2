//! Working copy of one step's fields.
//!
//! Nothing here validates. The draft only tracks what the person has typed
//! and the UI flags around loading and saving it.

use orbipax_core::step::WizardStepId;
use orbipax_schema::rules::Document;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct DraftStore {
    patient_id: Uuid,
    step: WizardStepId,
    data: Document,
    /// Bumped on every change to `data`, including resets.
    revision: u64,
    is_dirty: bool,
    is_loading: bool,
    is_saving: bool,
    load_error: Option<String>,
    save_error: Option<String>,
    last_saved_at: Option<jiff::Timestamp>,
}

impl DraftStore {
    pub fn new(patient_id: Uuid, step: WizardStepId) -> Self {
        Self {
            patient_id,
            step,
            data: Document::new(),
            revision: 0,
            is_dirty: false,
            is_loading: false,
            is_saving: false,
            load_error: None,
            save_error: None,
            last_saved_at: None,
        }
    }

    /// Shallow merge: top-level keys in `patch` replace existing ones.
    pub fn set_partial(&mut self, patch: Document) {
        for (key, value) in patch {
            self.data.insert(key, value);
        }
        self.revision += 1;
        self.is_dirty = true;
    }

    pub fn mark_saved(&mut self, at: Option<jiff::Timestamp>) {
        self.is_dirty = false;
        self.is_saving = false;
        self.save_error = None;
        self.last_saved_at = Some(at.unwrap_or_else(jiff::Timestamp::now));
    }

    pub fn reset(&mut self) {
        let revision = self.revision + 1;
        *self = Self::new(self.patient_id, self.step);
        self.revision = revision;
    }

    pub fn begin_load(&mut self) {
        self.is_loading = true;
        self.load_error = None;
    }

    /// Replace the working copy with stored data. `None` means nothing was
    /// stored and the current copy is kept.
    pub fn finish_load(&mut self, data: Option<Document>, saved_at: Option<jiff::Timestamp>) {
        self.is_loading = false;
        if let Some(data) = data {
            self.data = data;
            self.revision += 1;
            self.is_dirty = false;
            self.last_saved_at = saved_at;
        }
    }

    pub fn fail_load(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.load_error = Some(message.into());
    }

    pub fn begin_save(&mut self) {
        self.is_saving = true;
        self.save_error = None;
    }

    /// A save of the data as it was at `revision` went through. Only clears
    /// the dirty flag if nothing changed since.
    pub fn finish_save(&mut self, revision: u64, at: jiff::Timestamp) {
        self.is_saving = false;
        self.save_error = None;
        self.last_saved_at = Some(at);
        if self.revision == revision {
            self.is_dirty = false;
        }
    }

    pub fn fail_save(&mut self, message: impl Into<String>) {
        self.is_saving = false;
        self.save_error = Some(message.into());
    }

    pub fn snapshot(&self) -> Value {
        Value::Object(self.data.clone())
    }

    pub fn patient_id(&self) -> Uuid {
        self.patient_id
    }

    pub fn step(&self) -> WizardStepId {
        self.step
    }

    pub fn data(&self) -> &Document {
        &self.data
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    pub fn last_saved_at(&self) -> Option<jiff::Timestamp> {
        self.last_saved_at
    }
}
