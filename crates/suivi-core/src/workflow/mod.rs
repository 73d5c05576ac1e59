//! Workflow rules for a record.
//!
//! The pieces are layered bottom-up:
//!
//! - [`timer`]: the start/pause/resume/finish state machine shared by every
//!   timed task
//! - [`completeness`]: required fields per timed task
//! - [`validation`]: write-once operator/controller sign-off slots
//! - [`sequencer`]: which stage and which step is currently unlocked
//! - [`engine`]: [`apply_action`], the single entry point that checks roles
//!   and routes a [`Command`] to the rules above
//! - [`integrity`]: the same signer and validation rules, checked on a whole
//!   graph before it is saved
//!
//! Everything here is pure: it mutates an in-memory [`crate::models::Record`]
//! and never touches the database.

pub mod command;
pub mod completeness;
pub mod engine;
pub mod integrity;
pub mod sequencer;
pub mod timer;
pub mod validation;

pub use command::{ActionOutcome, Command, StepAction, TaskCommand};
pub use completeness::Completeness;
pub use engine::apply_action;
pub use integrity::ensure_consistent;
pub use sequencer::Stage;
pub use timer::{Timer, TimerAction, TimerState, TimerStatus};
pub use validation::{DualValidation, Participants, ValidationSlot};
