//! Error types for the checklist workflow library.

use std::path::PathBuf;

use thiserror::Error;

use crate::workflow::timer::{TimerAction, TimerState};

/// Error type for every tracker operation.
///
/// The workflow variants (`InvalidTransition` through `InvalidValue`) are
/// recoverable at the request boundary: the command that produced them left
/// the record untouched and the caller is expected to show the message to the
/// user. The remaining variants describe infrastructure failures.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Timer action attempted from a state that does not allow it
    #[error("Cannot {action} a task that is {from}")]
    InvalidTransition {
        from: TimerState,
        action: TimerAction,
    },
    /// Completeness rule failed for a timed task
    #[error("{task} is incomplete, missing: {}", .missing.join(", "))]
    IncompleteData {
        task: &'static str,
        missing: Vec<&'static str>,
    },
    /// Validation slot is already set
    #[error("{what} has already been validated")]
    AlreadyValidated { what: String },
    /// Mutation attempted on a step that is not the active one
    #[error("Step {step_id} is locked{}", locked_hint(.active_step_id))]
    StepLocked {
        step_id: u64,
        active_step_id: Option<u64>,
    },
    /// Precedence edge not satisfied
    #[error("{task} requires {predecessor} to be validated first")]
    PredecessorNotValidated {
        task: &'static str,
        predecessor: &'static str,
    },
    /// Missing record, step, sub-record, user or workshop
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: u64 },
    /// Actor does not hold the role required by the action
    #[error("User {user_id} is not allowed to do this: {reason}")]
    Unauthorized { user_id: u64, reason: String },
    /// Malformed input value
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG base directory errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

fn locked_hint(active_step_id: &Option<u64>) -> String {
    match active_step_id {
        Some(id) => format!(", step {id} must be marked conforming first"),
        None => ", the step sequence is complete".to_string(),
    }
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> WorkflowError {
        WorkflowError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidValueBuilder {
    field: String,
}

impl InvalidValueBuilder {
    /// Create a new invalid value error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> WorkflowError {
        WorkflowError::InvalidValue {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl WorkflowError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_value(field: impl Into<String>) -> InvalidValueBuilder {
        InvalidValueBuilder::new(field)
    }

    /// Shorthand for a role check failure.
    pub fn unauthorized(user_id: u64, reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            user_id,
            reason: reason.into(),
        }
    }

    /// Returns true for errors produced by workflow rules rather than by
    /// infrastructure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. }
                | Self::IncompleteData { .. }
                | Self::AlreadyValidated { .. }
                | Self::StepLocked { .. }
                | Self::PredecessorNotValidated { .. }
                | Self::NotFound { .. }
                | Self::Unauthorized { .. }
                | Self::InvalidValue { .. }
        )
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| WorkflowError::database(message).with_source(e))
    }
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_locked_message_names_active_step() {
        let err = WorkflowError::StepLocked {
            step_id: 3,
            active_step_id: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "Step 3 is locked, step 2 must be marked conforming first"
        );

        let done = WorkflowError::StepLocked {
            step_id: 3,
            active_step_id: None,
        };
        assert!(done.to_string().contains("sequence is complete"));
    }

    #[test]
    fn test_incomplete_data_lists_missing_fields() {
        let err = WorkflowError::IncompleteData {
            task: "Component measurement",
            missing: vec!["ciment", "comments"],
        };
        assert_eq!(
            err.to_string(),
            "Component measurement is incomplete, missing: ciment, comments"
        );
    }

    #[test]
    fn test_invalid_value_builder() {
        match WorkflowError::invalid_value("eau").with_reason("not a number") {
            WorkflowError::InvalidValue { field, reason } => {
                assert_eq!(field, "eau");
                assert_eq!(reason, "not a number");
            }
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_rejections_are_distinguished_from_infrastructure_errors() {
        assert!(WorkflowError::unauthorized(1, "not the operator").is_rejection());
        assert!(!WorkflowError::XdgDirectory("no home".into()).is_rejection());
    }
}
