//! Persistence of the two fixed timed tasks of a record.
//!
//! Both tables are keyed by `record_id`. Data columns are upserted as a
//! whole; the validation pair goes through [`super::store_slot`].

use rusqlite::{Connection, OptionalExtension, params};

use super::{optional_timestamp_at, slot_at, store_slot, timer_at, timestamp_text};
use crate::{
    error::{DatabaseResultExt, Result},
    models::{ComponentMeasurement, MixChecklist, MortarMix},
    workflow::Completeness,
};

const SELECT_MEASUREMENT_SQL: &str = "SELECT ciment, sable, agent_moussant, fibre_verre, dsp_xl, hdr, eau, comments, entered_at, validated_by, validated_at, started_at, paused_at, finished_at FROM component_measurements WHERE record_id = ?1";
const UPSERT_MEASUREMENT_SQL: &str = "INSERT INTO component_measurements (record_id, ciment, sable, agent_moussant, fibre_verre, dsp_xl, hdr, eau, comments, entered_at, started_at, paused_at, finished_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13) ON CONFLICT(record_id) DO UPDATE SET ciment = excluded.ciment, sable = excluded.sable, agent_moussant = excluded.agent_moussant, fibre_verre = excluded.fibre_verre, dsp_xl = excluded.dsp_xl, hdr = excluded.hdr, eau = excluded.eau, comments = excluded.comments, entered_at = excluded.entered_at, started_at = excluded.started_at, paused_at = excluded.paused_at, finished_at = excluded.finished_at";

const SELECT_MIX_SQL: &str = "SELECT density, comments, verser_eau, ajouter_fibre, melanger_1min, verser_ciment, ajuster_eau, mesurer_densite, entered_at, validated_by, validated_at, started_at, paused_at, finished_at FROM mortar_mixes WHERE record_id = ?1";
const UPSERT_MIX_SQL: &str = "INSERT INTO mortar_mixes (record_id, density, comments, verser_eau, ajouter_fibre, melanger_1min, verser_ciment, ajuster_eau, mesurer_densite, entered_at, started_at, paused_at, finished_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13) ON CONFLICT(record_id) DO UPDATE SET density = excluded.density, comments = excluded.comments, verser_eau = excluded.verser_eau, ajouter_fibre = excluded.ajouter_fibre, melanger_1min = excluded.melanger_1min, verser_ciment = excluded.verser_ciment, ajuster_eau = excluded.ajuster_eau, mesurer_densite = excluded.mesurer_densite, entered_at = excluded.entered_at, started_at = excluded.started_at, paused_at = excluded.paused_at, finished_at = excluded.finished_at";

pub(crate) fn fetch_measurement(
    conn: &Connection,
    record_id: u64,
) -> Result<Option<ComponentMeasurement>> {
    conn.query_row(SELECT_MEASUREMENT_SQL, params![record_id as i64], |row| {
        Ok(ComponentMeasurement {
            ciment: row.get(0)?,
            sable: row.get(1)?,
            agent_moussant: row.get(2)?,
            fibre_verre: row.get(3)?,
            dsp_xl: row.get(4)?,
            hdr: row.get(5)?,
            eau: row.get(6)?,
            comments: row.get(7)?,
            entered_at: optional_timestamp_at(row, 8)?,
            validation: slot_at(row, 9)?,
            timer: timer_at(row, 11)?,
        })
    })
    .optional()
    .db_context("Failed to query component measurement")
}

pub(crate) fn store_measurement(
    conn: &Connection,
    record_id: u64,
    task: &ComponentMeasurement,
) -> Result<()> {
    conn.execute(
        UPSERT_MEASUREMENT_SQL,
        params![
            record_id as i64,
            task.ciment,
            task.sable,
            task.agent_moussant,
            task.fibre_verre,
            task.dsp_xl,
            task.hdr,
            task.eau,
            task.comments,
            timestamp_text(task.entered_at),
            timestamp_text(task.timer.started_at),
            timestamp_text(task.timer.paused_at),
            timestamp_text(task.timer.finished_at),
        ],
    )
    .db_context("Failed to store component measurement")?;
    store_slot(
        conn,
        "component_measurements",
        "record_id",
        record_id,
        "validated",
        task.validation.as_ref(),
        ComponentMeasurement::TASK,
    )
}

pub(crate) fn fetch_mix(conn: &Connection, record_id: u64) -> Result<Option<MortarMix>> {
    conn.query_row(SELECT_MIX_SQL, params![record_id as i64], |row| {
        Ok(MortarMix {
            density: row.get(0)?,
            comments: row.get(1)?,
            checklist: MixChecklist {
                verser_eau: row.get(2)?,
                ajouter_fibre: row.get(3)?,
                melanger_1min: row.get(4)?,
                verser_ciment: row.get(5)?,
                ajuster_eau: row.get(6)?,
                mesurer_densite: row.get(7)?,
            },
            entered_at: optional_timestamp_at(row, 8)?,
            validation: slot_at(row, 9)?,
            timer: timer_at(row, 11)?,
        })
    })
    .optional()
    .db_context("Failed to query mortar mix")
}

pub(crate) fn store_mix(conn: &Connection, record_id: u64, task: &MortarMix) -> Result<()> {
    let checklist = &task.checklist;
    conn.execute(
        UPSERT_MIX_SQL,
        params![
            record_id as i64,
            task.density,
            task.comments,
            checklist.verser_eau,
            checklist.ajouter_fibre,
            checklist.melanger_1min,
            checklist.verser_ciment,
            checklist.ajuster_eau,
            checklist.mesurer_densite,
            timestamp_text(task.entered_at),
            timestamp_text(task.timer.started_at),
            timestamp_text(task.timer.paused_at),
            timestamp_text(task.timer.finished_at),
        ],
    )
    .db_context("Failed to store mortar mix")?;
    store_slot(
        conn,
        "mortar_mixes",
        "record_id",
        record_id,
        "validated",
        task.validation.as_ref(),
        MortarMix::TASK,
    )
}
