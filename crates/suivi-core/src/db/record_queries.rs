//! Record graph queries.
//!
//! A record is always read and written as a whole: the record row, its
//! steps, both timed tasks, attached incidents and the retrospective.
//! Reading a record that has no steps yet instantiates them from the current
//! step definitions, so every read runs inside a write transaction.

use std::cmp::Ordering;

use jiff::Timestamp;
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

use super::{
    slot_at, step_queries, store_slot, task_queries, timestamp_at,
    user_queries::require_user, workshop_queries::require_workshop,
};
use crate::{
    display::RecordExport,
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{Incident, Record, RecordSummary, Retrospective, Role},
    params::{ApplyAction, CreateRecord, ListRecords},
    workflow::{self, ActionOutcome, DualValidation},
};

const INSERT_RECORD_SQL: &str =
    "INSERT INTO records (operator_id, controller_id, workshop_id, created_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_RECORD_SQL: &str = "SELECT id, operator_id, controller_id, workshop_id, created_at, operator_signed_by, operator_signed_at, controller_signed_by, controller_signed_at, retrospective_id FROM records WHERE id = ?1";

const SELECT_RETROSPECTIVE_SQL: &str =
    "SELECT id, comment, created_at FROM retrospectives WHERE id = ?1";
const INSERT_RETROSPECTIVE_SQL: &str =
    "INSERT INTO retrospectives (comment, created_at) VALUES (?1, ?2)";
const UPDATE_RETROSPECTIVE_SQL: &str = "UPDATE retrospectives SET comment = ?1 WHERE id = ?2";
const LINK_RETROSPECTIVE_SQL: &str = "UPDATE records SET retrospective_id = ?1 WHERE id = ?2";

const SELECT_INCIDENTS_SQL: &str = "SELECT i.id, i.description, i.created_at FROM incidents i JOIN record_incidents ri ON ri.incident_id = i.id WHERE ri.record_id = ?1 ORDER BY i.id DESC";
const INSERT_INCIDENT_SQL: &str = "INSERT INTO incidents (description, created_at) VALUES (?1, ?2)";
const LINK_INCIDENT_SQL: &str =
    "INSERT OR IGNORE INTO record_incidents (record_id, incident_id) VALUES (?1, ?2)";

const SUMMARY_COLUMNS: &str =
    "id, workshop, created_at, total_steps, conforming_steps, signed";

/// Read the full graph of record `id`, creating its steps if needed.
pub(crate) fn fetch_record(conn: &Connection, id: u64) -> Result<Record> {
    let (mut record, retrospective_id) = conn
        .query_row(SELECT_RECORD_SQL, params![id as i64], |row| {
            let record = Record {
                id: row.get::<_, i64>(0)? as u64,
                operator_id: row.get::<_, i64>(1)? as u64,
                controller_id: row.get::<_, i64>(2)? as u64,
                workshop_id: row.get::<_, i64>(3)? as u64,
                created_at: timestamp_at(row, 4)?,
                steps: Vec::new(),
                incidents: Vec::new(),
                retrospective: None,
                measurement: None,
                mix: None,
                sign_off: DualValidation {
                    operator: slot_at(row, 5)?,
                    controller: slot_at(row, 7)?,
                },
            };
            Ok((record, row.get::<_, Option<i64>>(9)?))
        })
        .optional()
        .db_context("Failed to query record")?
        .ok_or(WorkflowError::NotFound {
            entity: "Record",
            id,
        })?;

    let created = step_queries::instantiate_steps(conn, id)?;
    if created > 0 {
        debug!("Record {id}: instantiated {created} steps");
    }
    record.steps = step_queries::fetch_steps(conn, id)?;
    record.measurement = task_queries::fetch_measurement(conn, id)?;
    record.mix = task_queries::fetch_mix(conn, id)?;
    record.incidents = fetch_incidents(conn, id)?;
    record.retrospective = match retrospective_id {
        Some(retrospective_id) => conn
            .query_row(
                SELECT_RETROSPECTIVE_SQL,
                params![retrospective_id],
                |row| {
                    Ok(Retrospective {
                        id: Some(row.get::<_, i64>(0)? as u64),
                        comment: row.get(1)?,
                        created_at: timestamp_at(row, 2)?,
                    })
                },
            )
            .optional()
            .db_context("Failed to query retrospective")?,
        None => None,
    };

    Ok(record)
}

/// Stored timestamps are RFC 3339 text of varying width, so ordering is done
/// on parsed values, with the id breaking ties.
fn newest_first<T: Ord>(a: (Timestamp, T), b: (Timestamp, T)) -> Ordering {
    b.cmp(&a)
}

fn fetch_incidents(conn: &Connection, record_id: u64) -> Result<Vec<Incident>> {
    let mut stmt = conn
        .prepare(SELECT_INCIDENTS_SQL)
        .db_context("Failed to prepare query")?;
    let mut incidents = stmt
        .query_map(params![record_id as i64], |row| {
            Ok(Incident {
                id: Some(row.get::<_, i64>(0)? as u64),
                description: row.get(1)?,
                created_at: timestamp_at(row, 2)?,
            })
        })
        .db_context("Failed to query incidents")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .db_context("Failed to fetch incidents")?;
    incidents.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
    Ok(incidents)
}

/// Write the full graph of `record`.
///
/// Newly filled slots must pass [`workflow::ensure_consistent`] against the
/// stored graph. Validation slots are compare-and-set: a slot already
/// holding a different value in the database fails with `AlreadyValidated`.
pub(crate) fn store_record(conn: &Connection, record: &Record) -> Result<()> {
    let stored = fetch_record(conn, record.id)?;
    workflow::ensure_consistent(&stored, record)?;
    let stored_retrospective = stored
        .retrospective
        .as_ref()
        .and_then(|retrospective| retrospective.id)
        .map(|id| id as i64);

    for role in [Role::Operator, Role::Controller] {
        store_slot(
            conn,
            "records",
            "id",
            record.id,
            &format!("{}_signed", role.as_str()),
            record.sign_off.slot(role),
            &format!("Record {} ({role})", record.id),
        )?;
    }

    for step in &record.steps {
        step_queries::store_step(conn, record.id, step)?;
    }
    if let Some(measurement) = &record.measurement {
        task_queries::store_measurement(conn, record.id, measurement)?;
    }
    if let Some(mix) = &record.mix {
        task_queries::store_mix(conn, record.id, mix)?;
    }

    for incident in &record.incidents {
        let incident_id = match incident.id {
            Some(id) => id as i64,
            None => {
                conn.execute(
                    INSERT_INCIDENT_SQL,
                    params![incident.description, incident.created_at.to_string()],
                )
                .db_context("Failed to insert incident")?;
                conn.last_insert_rowid()
            }
        };
        conn.execute(LINK_INCIDENT_SQL, params![record.id as i64, incident_id])
            .db_context("Failed to attach incident")?;
    }

    if let Some(retrospective) = &record.retrospective {
        match retrospective
            .id
            .map(|id| id as i64)
            .or(stored_retrospective)
        {
            Some(id) => {
                conn.execute(UPDATE_RETROSPECTIVE_SQL, params![retrospective.comment, id])
                    .db_context("Failed to update retrospective")?;
            }
            None => {
                conn.execute(
                    INSERT_RETROSPECTIVE_SQL,
                    params![
                        retrospective.comment,
                        retrospective.created_at.to_string()
                    ],
                )
                .db_context("Failed to insert retrospective")?;
                let id = conn.last_insert_rowid();
                conn.execute(LINK_RETROSPECTIVE_SQL, params![id, record.id as i64])
                    .db_context("Failed to attach retrospective")?;
            }
        }
    }

    Ok(())
}

impl super::Database {
    /// Opens a record for an active operator and an active controller.
    pub fn create_record(&mut self, params: &CreateRecord) -> Result<Record> {
        params.validate()?;
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let operator = require_user(&tx, params.operator_id)?;
        if !operator.is_active {
            return Err(WorkflowError::unauthorized(
                operator.id,
                "account has not been activated",
            ));
        }
        let controller = require_user(&tx, params.controller_id)?;
        if !controller.is_active || controller.role != Role::Controller {
            return Err(WorkflowError::invalid_value("controller_id").with_reason(format!(
                "user {} is not an active controller",
                controller.id
            )));
        }
        require_workshop(&tx, params.workshop_id)?;

        tx.execute(
            INSERT_RECORD_SQL,
            params![
                params.operator_id as i64,
                params.controller_id as i64,
                params.workshop_id as i64,
                Timestamp::now().to_string()
            ],
        )
        .db_context("Failed to insert record")?;
        let id = tx.last_insert_rowid() as u64;
        let record = fetch_record(&tx, id)?;

        tx.commit().db_context("Failed to commit transaction")?;
        info!(
            "Record {id} created by user {} with controller {}",
            params.operator_id, params.controller_id
        );
        Ok(record)
    }

    /// Loads the full graph of a record.
    pub fn load_record(&mut self, id: u64) -> Result<Record> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;
        let record = fetch_record(&tx, id)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(record)
    }

    /// Persists the full graph of a record and returns it as stored.
    pub fn save_record(&mut self, record: &Record) -> Result<Record> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;
        store_record(&tx, record)?;
        let stored = fetch_record(&tx, record.id)?;
        tx.commit().db_context("Failed to commit transaction")?;
        Ok(stored)
    }

    /// Loads the record and the actor, applies the command and stores the
    /// result, all in one IMMEDIATE transaction. Nothing is written when the
    /// command is rejected.
    pub fn apply_action(
        &mut self,
        params: &ApplyAction,
        now: Timestamp,
    ) -> Result<(Record, ActionOutcome)> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;

        let actor = require_user(&tx, params.actor_id)?;
        let mut record = fetch_record(&tx, params.record_id)?;
        let outcome = workflow::apply_action(&mut record, &actor, &params.command, now)?;
        store_record(&tx, &record)?;
        let record = fetch_record(&tx, params.record_id)?;

        tx.commit().db_context("Failed to commit transaction")?;
        Ok((record, outcome))
    }

    /// Lists record summaries, newest first.
    pub fn list_records(&self, params: &ListRecords) -> Result<Vec<RecordSummary>> {
        let mut query = format!("SELECT {SUMMARY_COLUMNS} FROM record_summaries");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();
        if let Some(operator_id) = params.operator_id {
            query.push_str(" WHERE operator_id = ?");
            params_vec.push(Box::new(operator_id as i64));
        }

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();
        let mut summaries = stmt
            .query_map(&params_refs[..], |row| {
                Ok(RecordSummary {
                    id: row.get::<_, i64>(0)? as u64,
                    workshop: row.get(1)?,
                    created_at: timestamp_at(row, 2)?,
                    total_steps: row.get(3)?,
                    conforming_steps: row.get(4)?,
                    signed: row.get(5)?,
                })
            })
            .db_context("Failed to query records")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch records")?;
        summaries.sort_by(|a, b| newest_first((a.created_at, a.id), (b.created_at, b.id)));
        Ok(summaries)
    }

    /// Builds the export projection of a record.
    pub fn export_record(&mut self, id: u64) -> Result<RecordExport> {
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .db_context("Failed to begin transaction")?;
        let record = fetch_record(&tx, id)?;
        let workshop = require_workshop(&tx, record.workshop_id)?;
        let operator = require_user(&tx, record.operator_id)?;
        let controller = require_user(&tx, record.controller_id)?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(RecordExport::new(&record, &workshop, &operator, &controller))
    }
}
