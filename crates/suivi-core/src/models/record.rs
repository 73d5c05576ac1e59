//! Record model (fiche de suivi) and the entries attached to it.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{ComponentMeasurement, MortarMix, Step};
use crate::workflow::{
    sequencer,
    validation::{DualValidation, Participants},
};

/// An incident logged during a run.
///
/// Incidents are created on their own and then attached to a record; `id` is
/// `None` until the incident has been stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Incident {
    pub id: Option<u64>,
    pub description: String,
    pub created_at: Timestamp,
}

/// Lessons learned (retour d'expérience) for a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Retrospective {
    pub id: Option<u64>,
    pub comment: String,
    pub created_at: Timestamp,
}

/// Represents one inspection run with its full object graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    /// Unique identifier for the record
    pub id: u64,

    /// User running the process
    pub operator_id: u64,

    /// User inspecting the process
    pub controller_id: u64,

    pub workshop_id: u64,

    /// Timestamp when the record was created (UTC)
    pub created_at: Timestamp,

    /// Dynamic steps, sorted by definition order
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Attached incidents, newest first
    #[serde(default)]
    pub incidents: Vec<Incident>,

    pub retrospective: Option<Retrospective>,

    /// Created on first start or save
    pub measurement: Option<ComponentMeasurement>,

    /// Created on first start or save
    pub mix: Option<MortarMix>,

    /// Record-level operator and controller sign-off
    pub sign_off: DualValidation,
}

impl Record {
    /// The two designated signers.
    pub fn participants(&self) -> Participants {
        Participants {
            operator_id: self.operator_id,
            controller_id: self.controller_id,
        }
    }

    /// The single step currently accepting mutations.
    pub fn active_step(&self) -> Option<&Step> {
        sequencer::active_step(&self.steps)
    }

    /// Whether every dynamic step has been marked conforming.
    pub fn steps_complete(&self) -> bool {
        self.active_step().is_none()
    }

    pub fn measurement_validated(&self) -> bool {
        self.measurement
            .as_ref()
            .is_some_and(ComponentMeasurement::is_validated)
    }

    pub fn mix_validated(&self) -> bool {
        self.mix.as_ref().is_some_and(MortarMix::is_validated)
    }
}
