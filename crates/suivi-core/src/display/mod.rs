//! Display formatting for models and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! this module adds newtype wrappers for collections, operation results and
//! the export projection. Everything renders as markdown, which the CLI
//! passes to its terminal renderer.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │ Wrappers &      │    │   Formatted     │
//! │ (Record, Step)  │───▶│ Result Types    │───▶│    Output       │
//! │                 │    │                 │    │  (markdown)     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: Collection wrapper types (RecordSummaries, Users, ...)
//! - [`results`]: Operation result types (CreateResult, UpdateResult,
//!   DeleteResult)
//! - [`status`]: Status and confirmation messages (OperationStatus)
//! - [`datetime`]: Timestamp and duration formatting
//! - [`export`]: The flat [`RecordExport`] projection
//!
//! ```rust
//! use suivi_core::display::OperationStatus;
//!
//! let status = OperationStatus::success("Record 3 signed by the operator");
//! assert_eq!(status.to_string(), "Success: Record 3 signed by the operator\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod export;
pub mod models;
pub mod results;
pub mod status;

pub use collections::{RecordSummaries, StepDefinitions, Users, Workshops};
pub use datetime::{Elapsed, LocalDateTime, MaybeDateTime};
pub use export::RecordExport;
pub use models::TimerSpan;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
