//! Async facade over the record store.
//!
//! [`Tracker`] is what interfaces talk to. Every operation clones the
//! database path into [`tokio::task::spawn_blocking`], opens a
//! [`Database`] there and runs the synchronous rusqlite work, so callers on
//! an async runtime never block it.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │    Handlers     │    │   Operations    │    │    Database     │
//! │ (display types) │───▶│ (account, ref., │───▶│   (via db/)     │
//! │                 │    │  record ops)    │    │                 │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`builder`]: [`TrackerBuilder`], database location and initialization
//! - [`account_ops`]: signup, activation and listing of users
//! - [`reference_ops`]: workshops and step definitions
//! - [`record_ops`]: record creation, loading, saving, commands and export
//! - [`handlers`]: list operations returning display wrappers
//!
//! ```rust,no_run
//! use suivi_core::{TrackerBuilder, params::ListRecords};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = TrackerBuilder::new()
//!     .with_database_path(Some("/tmp/suivi.db"))
//!     .build()
//!     .await?;
//! let records = tracker.list_records_summary(&ListRecords::default()).await?;
//! println!("{records}");
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use tokio::task;

use crate::{
    db::Database,
    error::{Result, WorkflowError},
};

pub mod account_ops;
pub mod builder;
pub mod handlers;
pub mod record_ops;
pub mod reference_ops;


pub use builder::TrackerBuilder;

/// Main interface for managing records and the entities around them.
pub struct Tracker {
    pub(crate) db_path: PathBuf,
}

impl Tracker {
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Path of the SQLite database file.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Run `op` against a fresh connection on the blocking thread pool.
    pub(crate) async fn with_database<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            op(&mut db)
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
