//! Step model: one record's instance of a step definition.

use serde::{Deserialize, Serialize};

use super::{StepDefinition, StepValidation};
use crate::workflow::{timer::Timer, validation::DualValidation};

/// Represents a checklist step (tâche) within a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Unique identifier for the step
    pub id: u64,

    /// ID of the owning record
    pub record_id: u64,

    /// Template entry this step instantiates; its `order` sequences the steps
    pub definition: StepDefinition,

    pub timer: Timer,

    /// Inspection outcome
    pub status: StepValidation,

    /// Free-text observations
    pub observations: String,

    /// Operator and controller sign-off
    pub sign_off: DualValidation,
}

impl Step {
    /// Position of the step in its record.
    pub fn order(&self) -> u32 {
        self.definition.order
    }

    /// Short name of the step.
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn is_conforming(&self) -> bool {
        self.status == StepValidation::Conforming
    }
}
