//! SQLite storage for users, workshops, step definitions and records.
//!
//! Each query module adds methods to [`Database`]. The record graph is read
//! and written by free functions over a [`Connection`] so that
//! [`Database::apply_action`] can run load, apply and store inside a single
//! IMMEDIATE transaction.

use std::{path::Path, time::Duration};

use jiff::Timestamp;
use rusqlite::{Connection, Row, params, types::Type};

use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    workflow::{Timer, ValidationSlot},
};

pub mod definition_queries;
pub mod migrations;
pub mod record_queries;
pub mod step_queries;
pub mod task_queries;
pub mod user_queries;
pub mod workshop_queries;

/// How long a writer waits for the database lock before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Opens a connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .db_context("Failed to set busy timeout")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}

fn conversion_error(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

/// Read a timestamp stored as RFC 3339 text.
pub(crate) fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(idx)?
        .parse::<Timestamp>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn optional_timestamp_at(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<Timestamp>> {
    row.get::<_, Option<String>>(idx)?
        .map(|text| {
            text.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
            })
        })
        .transpose()
}

/// Read an enum stored as text through its `FromStr` impl.
pub(crate) fn parsed_at<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let text: String = row.get(idx)?;
    text.parse::<T>().map_err(|e| conversion_error(idx, e))
}

/// Read `started_at, paused_at, finished_at` starting at `idx`.
pub(crate) fn timer_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Timer> {
    Ok(Timer {
        started_at: optional_timestamp_at(row, idx)?,
        paused_at: optional_timestamp_at(row, idx + 1)?,
        finished_at: optional_timestamp_at(row, idx + 2)?,
    })
}

/// Read a `(signed_by, signed_at)` column pair starting at `idx`.
pub(crate) fn slot_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<ValidationSlot>> {
    let validator: Option<i64> = row.get(idx)?;
    let at = optional_timestamp_at(row, idx + 1)?;
    Ok(match (validator, at) {
        (Some(validator_id), Some(validated_at)) => Some(ValidationSlot {
            validator_id: validator_id as u64,
            validated_at,
        }),
        _ => None,
    })
}

pub(crate) fn timestamp_text(ts: Option<Timestamp>) -> Option<String> {
    ts.map(|ts| ts.to_string())
}

/// Compare-and-set a `(<prefix>_by, <prefix>_at)` column pair.
///
/// The pair is written only while empty; writing the value it already holds
/// is accepted. Any other stored value fails with `AlreadyValidated`, so a
/// concurrent signer can never be overwritten.
pub(crate) fn store_slot(
    conn: &Connection,
    table: &str,
    key_column: &str,
    key: u64,
    prefix: &str,
    slot: Option<&ValidationSlot>,
    what: &str,
) -> Result<()> {
    let Some(slot) = slot else {
        return Ok(());
    };
    let sql = format!(
        "UPDATE {table} SET {prefix}_by = ?2, {prefix}_at = ?3 \
         WHERE {key_column} = ?1 AND ({prefix}_by IS NULL OR ({prefix}_by = ?2 AND {prefix}_at = ?3))"
    );
    let updated = conn
        .execute(
            &sql,
            params![
                key as i64,
                slot.validator_id as i64,
                slot.validated_at.to_string()
            ],
        )
        .db_context("Failed to store validation")?;
    if updated == 0 {
        return Err(WorkflowError::AlreadyValidated {
            what: what.to_string(),
        });
    }
    Ok(())
}
