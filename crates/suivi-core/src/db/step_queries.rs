//! Persistence of a record's dynamic steps.

use rusqlite::{Connection, Row, params};

use super::{
    definition_queries::build_definition_at, parsed_at, slot_at, store_slot, timer_at,
    timestamp_text,
};
use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{Role, Step},
    workflow::DualValidation,
};

const COUNT_STEPS_SQL: &str = "SELECT COUNT(*) FROM steps WHERE record_id = ?1";
const INSTANTIATE_STEPS_SQL: &str = "INSERT INTO steps (record_id, definition_id) SELECT ?1, id FROM step_definitions ORDER BY step_order";
const SELECT_STEPS_SQL: &str = "SELECT s.id, s.record_id, s.started_at, s.paused_at, s.finished_at, s.status, s.observations, s.operator_signed_by, s.operator_signed_at, s.controller_signed_by, s.controller_signed_at, d.id, d.name, d.description, d.instructions, d.step_order FROM steps s JOIN step_definitions d ON d.id = s.definition_id WHERE s.record_id = ?1 ORDER BY d.step_order";
const UPDATE_STEP_SQL: &str = "UPDATE steps SET started_at = ?1, paused_at = ?2, finished_at = ?3, status = ?4, observations = ?5 WHERE id = ?6 AND record_id = ?7";

fn build_step_from_row(row: &Row<'_>) -> rusqlite::Result<Step> {
    Ok(Step {
        id: row.get::<_, i64>(0)? as u64,
        record_id: row.get::<_, i64>(1)? as u64,
        timer: timer_at(row, 2)?,
        status: parsed_at(row, 5)?,
        observations: row.get(6)?,
        sign_off: DualValidation {
            operator: slot_at(row, 7)?,
            controller: slot_at(row, 9)?,
        },
        definition: build_definition_at(row, 11)?,
    })
}

/// Create one step per definition when the record has none yet.
///
/// Returns the number of steps created.
pub(crate) fn instantiate_steps(conn: &Connection, record_id: u64) -> Result<usize> {
    let existing: i64 = conn
        .query_row(COUNT_STEPS_SQL, params![record_id as i64], |row| row.get(0))
        .db_context("Failed to count steps")?;
    if existing > 0 {
        return Ok(0);
    }
    conn.execute(INSTANTIATE_STEPS_SQL, params![record_id as i64])
        .db_context("Failed to create steps")
}

/// Steps of a record in definition order.
pub(crate) fn fetch_steps(conn: &Connection, record_id: u64) -> Result<Vec<Step>> {
    let mut stmt = conn
        .prepare(SELECT_STEPS_SQL)
        .db_context("Failed to prepare query")?;
    let steps = stmt
        .query_map(params![record_id as i64], build_step_from_row)
        .db_context("Failed to query steps")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .db_context("Failed to fetch steps")?;
    Ok(steps)
}

pub(crate) fn store_step(conn: &Connection, record_id: u64, step: &Step) -> Result<()> {
    let updated = conn
        .execute(
            UPDATE_STEP_SQL,
            params![
                timestamp_text(step.timer.started_at),
                timestamp_text(step.timer.paused_at),
                timestamp_text(step.timer.finished_at),
                step.status.as_str(),
                step.observations,
                step.id as i64,
                record_id as i64
            ],
        )
        .db_context("Failed to update step")?;
    if updated == 0 {
        return Err(WorkflowError::NotFound {
            entity: "Step",
            id: step.id,
        });
    }

    for role in [Role::Operator, Role::Controller] {
        store_slot(
            conn,
            "steps",
            "id",
            step.id,
            &format!("{}_signed", role.as_str()),
            step.sign_off.slot(role),
            &format!("Step '{}' ({role})", step.name()),
        )?;
    }
    Ok(())
}
