//! Typed commands accepted by the workflow engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::timer::{TimerAction, TimerStatus};
use crate::{
    models::StepValidation,
    params::{MeasurementInput, MixInput},
};

/// Actions on one of the fixed timed tasks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TaskCommand<I> {
    /// Start, pause, resume or finish the task timer
    Timer(TimerAction),
    /// Store form data without validating
    Save(I),
    /// Store the provided data, then validate
    Validate(I),
}

/// Actions on a dynamic step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    /// Replace the observations text
    Observe(String),
    /// Record the inspection outcome
    SetStatus(StepValidation),
    /// Sign the slot of the caller's role
    Sign,
    Timer(TimerAction),
}

/// Everything an operator or a controller can do to a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Measurement(TaskCommand<MeasurementInput>),
    Mix(TaskCommand<MixInput>),
    Step { step_id: u64, action: StepAction },
    AddIncident { description: String },
    SetRetrospective { comment: String },
    SignRecord,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn task<I>(f: &mut fmt::Formatter<'_>, name: &str, cmd: &TaskCommand<I>) -> fmt::Result {
            match cmd {
                TaskCommand::Timer(action) => write!(f, "{name}.{action}"),
                TaskCommand::Save(_) => write!(f, "{name}.save"),
                TaskCommand::Validate(_) => write!(f, "{name}.validate"),
            }
        }

        match self {
            Command::Measurement(cmd) => task(f, "measurement", cmd),
            Command::Mix(cmd) => task(f, "mix", cmd),
            Command::Step { step_id, action } => match action {
                StepAction::Observe(_) => write!(f, "step.{step_id}.observe"),
                StepAction::SetStatus(status) => {
                    write!(f, "step.{step_id}.status.{}", status.as_str())
                }
                StepAction::Sign => write!(f, "step.{step_id}.sign"),
                StepAction::Timer(action) => write!(f, "step.{step_id}.{action}"),
            },
            Command::AddIncident { .. } => f.write_str("incident.add"),
            Command::SetRetrospective { .. } => f.write_str("retrospective.set"),
            Command::SignRecord => f.write_str("record.sign"),
        }
    }
}

/// Result of a successful command, with what a client needs to re-render.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActionOutcome {
    /// Confirmation shown to the user
    pub message: String,
    /// Active step after the command; `None` once every step conforms
    pub active_step_id: Option<u64>,
    /// Timer snapshot when the command touched a timer
    pub timer: Option<TimerStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_names() {
        assert_eq!(
            Command::Measurement(TaskCommand::Timer(TimerAction::Pause)).to_string(),
            "measurement.pause"
        );
        assert_eq!(
            Command::Step {
                step_id: 7,
                action: StepAction::SetStatus(StepValidation::NonConforming)
            }
            .to_string(),
            "step.7.status.non_conforming"
        );
        assert_eq!(Command::SignRecord.to_string(), "record.sign");
    }

    #[test]
    fn test_command_json_shape() {
        let command = Command::Step {
            step_id: 3,
            action: StepAction::Sign,
        };
        let json = serde_json::to_string(&command).unwrap();
        assert_eq!(json, r#"{"step":{"step_id":3,"action":"sign"}}"#);
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, command);
    }
}
