//! Operator/controller sign-off slots.
//!
//! A slot is written once and never again: the first signer wins and any
//! later attempt fails with [`WorkflowError::AlreadyValidated`], leaving the
//! slot as it was.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, WorkflowError},
    models::Role,
};

/// Who signed, and when.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationSlot {
    pub validator_id: u64,
    pub validated_at: Timestamp,
}

/// The designated signers of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Participants {
    pub operator_id: u64,
    pub controller_id: u64,
}

impl Participants {
    /// Role the user holds on this record, if any.
    pub fn role_of(&self, user_id: u64) -> Option<Role> {
        if user_id == self.operator_id {
            Some(Role::Operator)
        } else if user_id == self.controller_id {
            Some(Role::Controller)
        } else {
            None
        }
    }

    /// Fail with `Unauthorized` unless the user holds `role` on this record.
    pub fn require(&self, user_id: u64, role: Role) -> Result<()> {
        if self.role_of(user_id) == Some(role) {
            Ok(())
        } else {
            Err(WorkflowError::unauthorized(
                user_id,
                format!("only the record's {} may do this", role.as_str()),
            ))
        }
    }

    /// Fail with `Unauthorized` unless the user is the operator or the
    /// controller, returning the role held.
    pub fn require_participant(&self, user_id: u64) -> Result<Role> {
        self.role_of(user_id).ok_or_else(|| {
            WorkflowError::unauthorized(user_id, "not a participant of this record")
        })
    }
}

/// Set `slot` if it is empty.
pub fn sign_once(
    slot: &mut Option<ValidationSlot>,
    validator_id: u64,
    now: Timestamp,
    what: &str,
) -> Result<ValidationSlot> {
    if slot.is_some() {
        return Err(WorkflowError::AlreadyValidated {
            what: what.to_string(),
        });
    }
    let signed = ValidationSlot {
        validator_id,
        validated_at: now,
    };
    *slot = Some(signed);
    Ok(signed)
}

/// Two independent sign-off slots, one per role.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DualValidation {
    pub operator: Option<ValidationSlot>,
    pub controller: Option<ValidationSlot>,
}

impl DualValidation {
    pub fn slot(&self, role: Role) -> Option<&ValidationSlot> {
        match role {
            Role::Operator => self.operator.as_ref(),
            Role::Controller => self.controller.as_ref(),
        }
    }

    /// Sign the slot of `role` as `user_id`, who must hold that role on the
    /// record.
    pub fn sign(
        &mut self,
        role: Role,
        user_id: u64,
        participants: &Participants,
        now: Timestamp,
        what: &str,
    ) -> Result<ValidationSlot> {
        participants.require(user_id, role)?;
        let slot = match role {
            Role::Operator => &mut self.operator,
            Role::Controller => &mut self.controller,
        };
        sign_once(slot, user_id, now, &format!("{what} ({})", role.as_str()))
    }

    /// Both roles have signed.
    pub fn is_complete(&self) -> bool {
        self.operator.is_some() && self.controller.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARTICIPANTS: Participants = Participants {
        operator_id: 1,
        controller_id: 2,
    };

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_second(1_700_000_000 + secs).unwrap()
    }

    #[test]
    fn test_each_role_signs_its_own_slot() {
        let mut sign_off = DualValidation::default();
        sign_off
            .sign(Role::Operator, 1, &PARTICIPANTS, at(0), "Record")
            .unwrap();
        assert!(!sign_off.is_complete());
        sign_off
            .sign(Role::Controller, 2, &PARTICIPANTS, at(5), "Record")
            .unwrap();
        assert!(sign_off.is_complete());
        assert_eq!(sign_off.slot(Role::Controller).unwrap().validator_id, 2);
        assert_eq!(sign_off.slot(Role::Operator).unwrap().validated_at, at(0));
    }

    #[test]
    fn test_wrong_user_is_unauthorized() {
        let mut sign_off = DualValidation::default();
        let err = sign_off
            .sign(Role::Controller, 1, &PARTICIPANTS, at(0), "Record")
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Unauthorized { user_id: 1, .. }));
        let err = sign_off
            .sign(Role::Operator, 99, &PARTICIPANTS, at(0), "Record")
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Unauthorized { user_id: 99, .. }));
        assert_eq!(sign_off, DualValidation::default());
    }

    #[test]
    fn test_slot_is_immutable_once_set() {
        let mut sign_off = DualValidation::default();
        sign_off
            .sign(Role::Operator, 1, &PARTICIPANTS, at(0), "Step 4")
            .unwrap();
        let first = sign_off;

        let err = sign_off
            .sign(Role::Operator, 1, &PARTICIPANTS, at(60), "Step 4")
            .unwrap_err();
        match err {
            WorkflowError::AlreadyValidated { what } => assert_eq!(what, "Step 4 (operator)"),
            other => panic!("Expected AlreadyValidated, got {other:?}"),
        }
        assert_eq!(sign_off, first);
    }

    #[test]
    fn test_participant_roles() {
        assert_eq!(PARTICIPANTS.role_of(1), Some(Role::Operator));
        assert_eq!(PARTICIPANTS.role_of(2), Some(Role::Controller));
        assert_eq!(PARTICIPANTS.role_of(3), None);
        assert!(PARTICIPANTS.require_participant(3).is_err());
    }
}
