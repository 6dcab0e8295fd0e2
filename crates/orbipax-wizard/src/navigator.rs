//! Step navigation.
//!
//! The navigator owns no validation policy: whether the current step is
//! valid is pushed in from outside via [`WizardNavigator::set_current_step_valid`].
//! Refused transitions are no-ops that return `false`.

use std::collections::{BTreeSet, HashSet};

use orbipax_core::step::{StepConfig, WizardStepId, default_steps};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::NavigatorError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WizardProgress {
    pub current_step: WizardStepId,
    pub visited_steps: BTreeSet<WizardStepId>,
    pub completed_steps: BTreeSet<WizardStepId>,
    pub is_current_step_valid: bool,
    pub allow_skip_ahead: bool,
}

impl WizardProgress {
    fn starting_at(first: WizardStepId, allow_skip_ahead: bool) -> Self {
        Self {
            current_step: first,
            visited_steps: BTreeSet::from([first]),
            completed_steps: BTreeSet::new(),
            is_current_step_valid: false,
            allow_skip_ahead,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StepStatus {
    Current,
    Completed,
    Visited,
    Upcoming,
    /// Not in the configured step list.
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct WizardNavigator {
    steps: Vec<StepConfig>,
    progress: WizardProgress,
}

impl WizardNavigator {
    pub fn new(steps: Vec<StepConfig>) -> Result<Self, NavigatorError> {
        let first = steps.first().ok_or(NavigatorError::Empty)?.id;
        let mut seen = HashSet::new();
        for config in &steps {
            if !seen.insert(config.id) {
                return Err(NavigatorError::DuplicateStep(config.id));
            }
        }
        Ok(Self {
            steps,
            progress: WizardProgress::starting_at(first, false),
        })
    }

    pub fn steps(&self) -> &[StepConfig] {
        &self.steps
    }

    pub fn progress(&self) -> &WizardProgress {
        &self.progress
    }

    pub fn current_step(&self) -> WizardStepId {
        self.progress.current_step
    }

    fn index_of(&self, step: WizardStepId) -> Option<usize> {
        self.steps.iter().position(|config| config.id == step)
    }

    fn current_index(&self) -> usize {
        self.index_of(self.progress.current_step).unwrap_or(0)
    }

    fn move_to(&mut self, step: WizardStepId) {
        self.progress.visited_steps.insert(step);
        self.progress.current_step = step;
        self.progress.is_current_step_valid = self.progress.completed_steps.contains(&step);
    }

    /// Jump to a configured step. Steps ahead of the current one that were
    /// never visited are only reachable when the navigator could advance.
    pub fn go_to_step(&mut self, step: WizardStepId) -> bool {
        let Some(target) = self.index_of(step) else {
            tracing::debug!(%step, "ignoring navigation to unconfigured step");
            return false;
        };
        if target > self.current_index()
            && !self.progress.visited_steps.contains(&step)
            && !self.can_advance()
        {
            tracing::debug!(%step, current = %self.progress.current_step, "ignoring skip ahead");
            return false;
        }
        self.move_to(step);
        true
    }

    pub fn next_step(&mut self) -> bool {
        if !self.can_advance() {
            tracing::debug!(current = %self.progress.current_step, "cannot advance");
            return false;
        }
        let current = self.progress.current_step;
        if self.progress.is_current_step_valid {
            self.progress.completed_steps.insert(current);
        }
        let next = self.steps[self.current_index() + 1].id;
        self.move_to(next);
        true
    }

    pub fn prev_step(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        let prev = self.steps[self.current_index() - 1].id;
        self.move_to(prev);
        true
    }

    /// `(index + 1) / total * 100`.
    pub fn progress_percentage(&self) -> f64 {
        (self.current_index() + 1) as f64 * 100.0 / self.steps.len() as f64
    }

    pub fn can_advance(&self) -> bool {
        self.current_index() + 1 < self.steps.len()
            && (self.progress.is_current_step_valid || self.progress.allow_skip_ahead)
    }

    pub fn can_go_back(&self) -> bool {
        self.current_index() > 0
    }

    pub fn is_last_step(&self) -> bool {
        self.current_index() + 1 == self.steps.len()
    }

    pub fn step_status(&self, step: WizardStepId) -> StepStatus {
        if self.index_of(step).is_none() {
            StepStatus::Unavailable
        } else if step == self.progress.current_step {
            StepStatus::Current
        } else if self.progress.completed_steps.contains(&step) {
            StepStatus::Completed
        } else if self.progress.visited_steps.contains(&step) {
            StepStatus::Visited
        } else {
            StepStatus::Upcoming
        }
    }

    /// Unconfigured steps are reported as not optional.
    pub fn is_optional(&self, step: WizardStepId) -> bool {
        self.steps
            .iter()
            .any(|config| config.id == step && config.is_optional)
    }

    pub fn set_current_step_valid(&mut self, valid: bool) {
        self.progress.is_current_step_valid = valid;
    }

    pub fn set_allow_skip_ahead(&mut self, allow: bool) {
        self.progress.allow_skip_ahead = allow;
    }

    /// Record that a step has a valid saved record.
    pub fn mark_completed(&mut self, step: WizardStepId) {
        if self.index_of(step).is_some() {
            self.progress.completed_steps.insert(step);
        }
    }

    /// Back to the first step with nothing visited or completed. The
    /// skip-ahead setting is configuration and survives.
    pub fn reset(&mut self) {
        let first = self.steps[0].id;
        self.progress = WizardProgress::starting_at(first, self.progress.allow_skip_ahead);
    }
}

impl Default for WizardNavigator {
    fn default() -> Self {
        let steps = default_steps();
        let first = steps[0].id;
        Self {
            steps,
            progress: WizardProgress::starting_at(first, false),
        }
    }
}
