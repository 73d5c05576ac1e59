//! Core library for Suivi, the workshop quality-control checklist.
//!
//! A record (fiche de suivi) follows one inspection run through three
//! stages: a component measurement, a mortar mix and an ordered list of
//! checklist steps. An operator runs the process, a controller inspects it,
//! and both sign off.
//!
//! - [`workflow`]: the pure rules (timers, completeness, sign-off slots,
//!   step sequencing) and [`workflow::apply_action`], which routes a typed
//!   [`Command`] to them
//! - [`db`]: SQLite persistence of the record graph
//! - [`tracker`]: the async [`Tracker`] facade used by interfaces
//! - [`display`]: markdown rendering and the [`display::RecordExport`]
//!   projection
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use suivi_core::{
//!     TrackerBuilder,
//!     models::Role,
//!     params::{ApplyAction, CreateRecord, CreateWorkshop, Id, SignupRequest},
//!     workflow::{Command, TaskCommand, TimerAction},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = TrackerBuilder::new()
//!     .with_database_path(Some("suivi.db"))
//!     .build()
//!     .await?;
//!
//! let signup = |username: &str, role| SignupRequest {
//!     username: username.to_string(),
//!     email: format!("{username}@example.com"),
//!     first_name: String::new(),
//!     last_name: String::new(),
//!     role,
//! };
//! let operator = tracker.signup(&signup("op", Role::Operator)).await?;
//! let controller = tracker.signup(&signup("ctl", Role::Controller)).await?;
//! tracker.activate_user(&Id { id: operator.id }).await?;
//! tracker.activate_user(&Id { id: controller.id }).await?;
//!
//! let workshop = tracker
//!     .create_workshop(&CreateWorkshop { name: "Atelier Nord".to_string() })
//!     .await?;
//! let record = tracker
//!     .create_record(&CreateRecord {
//!         operator_id: operator.id,
//!         workshop_id: workshop.id,
//!         controller_id: controller.id,
//!     })
//!     .await?;
//!
//! let (record, outcome) = tracker
//!     .apply_action(&ApplyAction {
//!         record_id: record.id,
//!         actor_id: operator.id,
//!         command: Command::Measurement(TaskCommand::Timer(TimerAction::Start)),
//!     })
//!     .await?;
//! println!("{outcome}");
//! println!("{record}");
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod tracker;
pub mod workflow;

pub use db::Database;
pub use display::{
    CreateResult, DeleteResult, OperationStatus, RecordExport, RecordSummaries, UpdateResult,
};
pub use error::{Result, WorkflowError};
pub use models::{Record, RecordSummary, Role, Step, StepValidation, User, Workshop};
pub use params::{ApplyAction, CreateRecord, Id, ListRecords, SignupRequest};
pub use tracker::{Tracker, TrackerBuilder};
pub use workflow::{ActionOutcome, Command, StepAction, TaskCommand, TimerAction};
