//! Checks a record graph must pass before it is written.
//!
//! Slots already stored are immutable and enforced by the storage layer;
//! here only the slots a save would newly fill are examined. Each one must
//! name a signer entitled to it, and a newly validated task must be complete
//! with its predecessor validated.

use super::{
    completeness::Completeness,
    sequencer::Stage,
    validation::{DualValidation, Participants, ValidationSlot},
};
use crate::{
    error::Result,
    models::{Record, Role},
};

fn newly_set<'a>(
    before: Option<&ValidationSlot>,
    after: Option<&'a ValidationSlot>,
) -> Option<&'a ValidationSlot> {
    match (before, after) {
        (None, Some(slot)) => Some(slot),
        _ => None,
    }
}

fn check_sign_off(
    participants: &Participants,
    before: Option<&DualValidation>,
    after: &DualValidation,
) -> Result<()> {
    for role in [Role::Operator, Role::Controller] {
        let previous = before.and_then(|sign_off| sign_off.slot(role));
        if let Some(slot) = newly_set(previous, after.slot(role)) {
            participants.require(slot.validator_id, role)?;
        }
    }
    Ok(())
}

/// Fail when `updated` fills a slot that `stored` leaves empty in a way the
/// workflow would have refused.
///
/// Participants are taken from `stored`, so rewriting the record's operator
/// or controller does not widen who may sign.
pub fn ensure_consistent(stored: &Record, updated: &Record) -> Result<()> {
    let participants = stored.participants();

    check_sign_off(&participants, Some(&stored.sign_off), &updated.sign_off)?;
    for step in &updated.steps {
        let before = stored
            .steps
            .iter()
            .find(|s| s.id == step.id)
            .map(|s| &s.sign_off);
        check_sign_off(&participants, before, &step.sign_off)?;
    }

    if let Some(measurement) = &updated.measurement {
        let previous = stored
            .measurement
            .as_ref()
            .and_then(|m| m.validation.as_ref());
        if let Some(slot) = newly_set(previous, measurement.validation.as_ref()) {
            participants.require_participant(slot.validator_id)?;
            Stage::Measurement.ensure_unlocked(updated)?;
            measurement.ensure_complete()?;
        }
    }

    if let Some(mix) = &updated.mix {
        let previous = stored.mix.as_ref().and_then(|m| m.validation.as_ref());
        if let Some(slot) = newly_set(previous, mix.validation.as_ref()) {
            participants.require_participant(slot.validator_id)?;
            Stage::Mix.ensure_unlocked(updated)?;
            mix.ensure_complete()?;
        }
    }

    Ok(())
}
