//! Record-level orchestration of the workflow rules.
//!
//! [`apply_action`] checks who is acting, routes the command to the task,
//! step or record it targets, and re-derives the active step. Commands run
//! against a scratch copy of the record which replaces the original only on
//! success, so a rejected command never leaves a partial change behind.

use jiff::Timestamp;
use log::{debug, info, warn};

use super::{
    command::{ActionOutcome, Command, StepAction, TaskCommand},
    completeness::Completeness,
    sequencer::{self, Stage},
    timer::{TimerAction, TimerStatus},
    validation::sign_once,
};
use crate::{
    error::{Result, WorkflowError},
    models::{ComponentMeasurement, Incident, MortarMix, Record, Retrospective, Role, User},
    params::{MeasurementInput, MixInput},
};

type Applied = (String, Option<TimerStatus>);

/// Apply `command` to `record` on behalf of `actor`.
///
/// On error `record` is left exactly as it was.
pub fn apply_action(
    record: &mut Record,
    actor: &User,
    command: &Command,
    now: Timestamp,
) -> Result<ActionOutcome> {
    let mut draft = record.clone();
    match dispatch(&mut draft, actor, command, now) {
        Ok(outcome) => {
            debug!(
                "Record {}: {command} by user {} applied",
                record.id, actor.id
            );
            *record = draft;
            Ok(outcome)
        }
        Err(e) => {
            warn!(
                "Record {}: {command} by user {} rejected: {e}",
                record.id, actor.id
            );
            Err(e)
        }
    }
}

fn dispatch(
    record: &mut Record,
    actor: &User,
    command: &Command,
    now: Timestamp,
) -> Result<ActionOutcome> {
    if !actor.is_active {
        return Err(WorkflowError::unauthorized(
            actor.id,
            "account has not been activated",
        ));
    }
    let role = record.participants().require_participant(actor.id)?;

    let (message, timer) = match command {
        Command::Measurement(cmd) => measurement(record, actor.id, cmd, now)?,
        Command::Mix(cmd) => mix(record, actor.id, cmd, now)?,
        Command::Step { step_id, action } => step(record, actor.id, role, *step_id, action, now)?,
        Command::AddIncident { description } => (add_incident(record, description, now)?, None),
        Command::SetRetrospective { comment } => {
            (set_retrospective(record, comment, now)?, None)
        }
        Command::SignRecord => {
            let participants = record.participants();
            let what = format!("Record {}", record.id);
            record
                .sign_off
                .sign(role, actor.id, &participants, now, &what)?;
            info!("Record {} signed by {} {}", record.id, role.as_str(), actor.id);
            (format!("{what} signed by the {}", role.as_str()), None)
        }
    };

    sequencer::sort_steps(&mut record.steps);
    Ok(ActionOutcome {
        message,
        active_step_id: sequencer::active_step_id(&record.steps),
        timer,
    })
}

fn past_tense(action: TimerAction) -> &'static str {
    match action {
        TimerAction::Start => "started",
        TimerAction::Pause => "paused",
        TimerAction::Resume => "resumed",
        TimerAction::Finish => "finished",
    }
}

fn missing(entity: &'static str, record_id: u64) -> WorkflowError {
    WorkflowError::NotFound {
        entity,
        id: record_id,
    }
}

fn already_validated(what: &str) -> WorkflowError {
    WorkflowError::AlreadyValidated {
        what: what.to_string(),
    }
}

fn measurement(
    record: &mut Record,
    actor_id: u64,
    cmd: &TaskCommand<MeasurementInput>,
    now: Timestamp,
) -> Result<Applied> {
    const NAME: &str = ComponentMeasurement::TASK;
    let participants = record.participants();
    let record_id = record.id;

    match cmd {
        TaskCommand::Timer(action) => {
            participants.require(actor_id, Role::Operator)?;
            let task = match action {
                TimerAction::Start => record.measurement.get_or_insert_with(Default::default),
                _ => record
                    .measurement
                    .as_mut()
                    .ok_or_else(|| missing(NAME, record_id))?,
            };
            let status = task.timer.apply(*action, now)?;
            Ok((format!("{NAME} {}", past_tense(*action)), Some(status)))
        }
        TaskCommand::Save(input) => {
            participants.require(actor_id, Role::Operator)?;
            let task = record.measurement.get_or_insert_with(Default::default);
            if task.is_validated() {
                return Err(already_validated(NAME));
            }
            task.replace_from(input, now)?;
            Ok((format!("{NAME} data saved"), None))
        }
        TaskCommand::Validate(input) => {
            let task = record
                .measurement
                .as_mut()
                .ok_or_else(|| missing(NAME, record_id))?;
            if task.is_validated() {
                return Err(already_validated(NAME));
            }
            task.merge_from(input, now)?;
            task.ensure_complete()?;
            sign_once(&mut task.validation, actor_id, now, NAME)?;
            info!("Record {record_id}: {NAME} validated by user {actor_id}");
            Ok((format!("{NAME} validated"), None))
        }
    }
}

fn mix(
    record: &mut Record,
    actor_id: u64,
    cmd: &TaskCommand<MixInput>,
    now: Timestamp,
) -> Result<Applied> {
    const NAME: &str = MortarMix::TASK;
    let participants = record.participants();
    let record_id = record.id;

    match cmd {
        TaskCommand::Timer(action) => {
            participants.require(actor_id, Role::Operator)?;
            let task = match action {
                TimerAction::Start => {
                    Stage::Mix.ensure_unlocked(record)?;
                    record.mix.get_or_insert_with(Default::default)
                }
                _ => record
                    .mix
                    .as_mut()
                    .ok_or_else(|| missing(NAME, record_id))?,
            };
            let status = task.timer.apply(*action, now)?;
            Ok((format!("{NAME} {}", past_tense(*action)), Some(status)))
        }
        TaskCommand::Save(input) => {
            participants.require(actor_id, Role::Operator)?;
            let task = record.mix.get_or_insert_with(Default::default);
            if task.is_validated() {
                return Err(already_validated(NAME));
            }
            task.replace_from(input, now)?;
            Ok((format!("{NAME} data saved"), None))
        }
        TaskCommand::Validate(input) => {
            Stage::Mix.ensure_unlocked(record)?;
            let task = record
                .mix
                .as_mut()
                .ok_or_else(|| missing(NAME, record_id))?;
            if task.is_validated() {
                return Err(already_validated(NAME));
            }
            task.merge_from(input, now)?;
            task.ensure_complete()?;
            sign_once(&mut task.validation, actor_id, now, NAME)?;
            info!("Record {record_id}: {NAME} validated by user {actor_id}");
            Ok((format!("{NAME} validated"), None))
        }
    }
}

fn step(
    record: &mut Record,
    actor_id: u64,
    role: Role,
    step_id: u64,
    action: &StepAction,
    now: Timestamp,
) -> Result<Applied> {
    let participants = record.participants();
    match action {
        StepAction::SetStatus(_) => participants.require(actor_id, Role::Controller)?,
        StepAction::Timer(_) => participants.require(actor_id, Role::Operator)?,
        StepAction::Observe(_) | StepAction::Sign => {}
    }
    Stage::Steps.ensure_unlocked(record)?;

    let step = sequencer::unlocked_step_mut(&mut record.steps, step_id)?;
    match action {
        StepAction::Observe(text) => {
            step.observations = text.clone();
            Ok((format!("Observations saved for step '{}'", step.name()), None))
        }
        StepAction::SetStatus(status) => {
            step.status = *status;
            Ok((
                format!("Step '{}' marked {}", step.name(), status.label()),
                None,
            ))
        }
        StepAction::Sign => {
            let what = format!("Step '{}'", step.name());
            step.sign_off.sign(role, actor_id, &participants, now, &what)?;
            Ok((format!("{what} signed by the {}", role.as_str()), None))
        }
        StepAction::Timer(timer_action) => {
            let status = step.timer.apply(*timer_action, now)?;
            Ok((
                format!("Step '{}' {}", step.name(), past_tense(*timer_action)),
                Some(status),
            ))
        }
    }
}

fn require_text(field: &str, text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        Err(WorkflowError::invalid_value(field).with_reason("must not be empty"))
    } else {
        Ok(text.to_string())
    }
}

fn add_incident(record: &mut Record, description: &str, now: Timestamp) -> Result<String> {
    let description = require_text("description", description)?;
    record.incidents.insert(
        0,
        Incident {
            id: None,
            description,
            created_at: now,
        },
    );
    Ok("Incident recorded".to_string())
}

fn set_retrospective(record: &mut Record, comment: &str, now: Timestamp) -> Result<String> {
    let comment = require_text("comment", comment)?;
    match &mut record.retrospective {
        Some(existing) => existing.comment = comment,
        None => {
            record.retrospective = Some(Retrospective {
                id: None,
                comment,
                created_at: now,
            })
        }
    }
    Ok("Retrospective saved".to_string())
}
