//! Data models for records, steps and the entities around them.
//!
//! A [`Record`] is loaded and stored as a whole object graph: its dynamic
//! [`Step`]s, the two fixed timed tasks ([`ComponentMeasurement`] and
//! [`MortarMix`]), attached [`Incident`]s and the optional
//! [`Retrospective`]. The workflow rules that mutate this graph live in
//! [`crate::workflow`]; Display implementations live in
//! [`crate::display::models`].
//!
//! # Examples
//!
//! ```rust
//! use suivi_core::models::{Record, StepValidation};
//! use suivi_core::workflow::validation::DualValidation;
//! use jiff::Timestamp;
//!
//! let record = Record {
//!     id: 1,
//!     operator_id: 10,
//!     controller_id: 20,
//!     workshop_id: 3,
//!     created_at: Timestamp::now(),
//!     steps: vec![],
//!     incidents: vec![],
//!     retrospective: None,
//!     measurement: None,
//!     mix: None,
//!     sign_off: DualValidation::default(),
//! };
//! // No steps means nothing is left to inspect.
//! assert!(record.steps_complete());
//! assert_eq!(StepValidation::default(), StepValidation::Pending);
//! ```

pub mod record;
pub mod status;
pub mod step;
pub mod summary;
pub mod timed_task;
pub mod user;

#[cfg(test)]
mod tests;

pub use record::{Incident, Record, Retrospective};
pub use status::{Role, StepValidation};
pub use step::Step;
pub use summary::RecordSummary;
pub use timed_task::{ComponentMeasurement, MixChecklist, MortarMix};
pub use user::{StepDefinition, User, Workshop};
