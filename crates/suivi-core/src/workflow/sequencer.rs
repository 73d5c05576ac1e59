//! Ordering rules: which part of a record is unlocked.
//!
//! Two gates apply. Between stages, a precedence graph
//! `measurement → mix → steps` requires each stage's predecessor to be
//! validated. Within the dynamic steps, only the active step (the
//! lowest-ordered step not yet conforming) accepts mutations.

use crate::{
    error::{Result, WorkflowError},
    models::{Record, Step},
};

/// Stages of a record, in the order they unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Measurement,
    Mix,
    Steps,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Measurement => "Component measurement",
            Stage::Mix => "Mortar mix",
            Stage::Steps => "Checklist steps",
        }
    }

    /// The stage that must be validated before this one opens.
    pub fn predecessor(&self) -> Option<Stage> {
        match self {
            Stage::Measurement => None,
            Stage::Mix => Some(Stage::Measurement),
            Stage::Steps => Some(Stage::Mix),
        }
    }

    /// Whether the stage itself is validated on `record`.
    pub fn is_validated(&self, record: &Record) -> bool {
        match self {
            Stage::Measurement => record.measurement_validated(),
            Stage::Mix => record.mix_validated(),
            Stage::Steps => record.steps_complete(),
        }
    }

    /// Fail with `PredecessorNotValidated` when the predecessor stage is not
    /// validated yet.
    pub fn ensure_unlocked(&self, record: &Record) -> Result<()> {
        match self.predecessor() {
            Some(previous) if !previous.is_validated(record) => {
                Err(WorkflowError::PredecessorNotValidated {
                    task: self.name(),
                    predecessor: previous.name(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// The lowest-ordered step that is not conforming, if any.
pub fn active_step(steps: &[Step]) -> Option<&Step> {
    steps
        .iter()
        .filter(|step| !step.is_conforming())
        .min_by_key(|step| step.order())
}

pub fn active_step_id(steps: &[Step]) -> Option<u64> {
    active_step(steps).map(|step| step.id)
}

/// Sort steps by their definition order.
pub fn sort_steps(steps: &mut [Step]) {
    steps.sort_by_key(Step::order);
}

/// Borrow step `step_id` for mutation, provided it is the active step.
///
/// Fails with `NotFound` when the step does not belong to `steps`, and with
/// `StepLocked` when it is not the active step.
pub fn unlocked_step_mut(steps: &mut [Step], step_id: u64) -> Result<&mut Step> {
    let active = active_step_id(steps);
    let step = steps
        .iter_mut()
        .find(|step| step.id == step_id)
        .ok_or(WorkflowError::NotFound {
            entity: "Step",
            id: step_id,
        })?;
    if active == Some(step_id) {
        Ok(step)
    } else {
        Err(WorkflowError::StepLocked {
            step_id,
            active_step_id: active,
        })
    }
}
