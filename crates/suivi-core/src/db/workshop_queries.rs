//! Workshop queries.

use log::info;
use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::Workshop,
    params::{CreateWorkshop, RenameWorkshop},
};

const INSERT_WORKSHOP_SQL: &str = "INSERT INTO workshops (name) VALUES (?1)";
const SELECT_WORKSHOP_SQL: &str = "SELECT id, name FROM workshops WHERE id = ?1";
const SELECT_WORKSHOPS_SQL: &str = "SELECT id, name FROM workshops ORDER BY name, id";
const RENAME_WORKSHOP_SQL: &str = "UPDATE workshops SET name = ?1 WHERE id = ?2";
const DELETE_WORKSHOP_SQL: &str = "DELETE FROM workshops WHERE id = ?1";

pub(crate) fn require_workshop(conn: &Connection, id: u64) -> Result<Workshop> {
    conn.query_row(SELECT_WORKSHOP_SQL, params![id as i64], |row| {
        Ok(Workshop {
            id: row.get::<_, i64>(0)? as u64,
            name: row.get(1)?,
        })
    })
    .optional()
    .db_context("Failed to query workshop")?
    .ok_or(WorkflowError::NotFound {
        entity: "Workshop",
        id,
    })
}

impl super::Database {
    pub fn create_workshop(&mut self, params: &CreateWorkshop) -> Result<Workshop> {
        params.validate()?;
        let name = params.name.trim();
        self.connection
            .execute(INSERT_WORKSHOP_SQL, params![name])
            .db_context("Failed to insert workshop")?;
        let id = self.connection.last_insert_rowid() as u64;
        info!("Workshop '{name}' created with ID {id}");
        Ok(Workshop {
            id,
            name: name.to_string(),
        })
    }

    pub fn get_workshop(&self, id: u64) -> Result<Workshop> {
        require_workshop(&self.connection, id)
    }

    pub fn list_workshops(&self) -> Result<Vec<Workshop>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_WORKSHOPS_SQL)
            .db_context("Failed to prepare query")?;
        let workshops = stmt
            .query_map([], |row| {
                Ok(Workshop {
                    id: row.get::<_, i64>(0)? as u64,
                    name: row.get(1)?,
                })
            })
            .db_context("Failed to query workshops")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch workshops")?;
        Ok(workshops)
    }

    /// Renames a workshop, returning it with its previous name.
    pub fn rename_workshop(&mut self, params: &RenameWorkshop) -> Result<(Workshop, String)> {
        params.validate()?;
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        let previous = require_workshop(&tx, params.id)?;
        let name = params.name.trim();
        tx.execute(RENAME_WORKSHOP_SQL, params![name, params.id as i64])
            .db_context("Failed to rename workshop")?;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok((
            Workshop {
                id: params.id,
                name: name.to_string(),
            },
            previous.name,
        ))
    }

    /// Deletes a workshop; its records go with it.
    pub fn delete_workshop(&mut self, id: u64) -> Result<Workshop> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;
        let workshop = require_workshop(&tx, id)?;
        tx.execute(DELETE_WORKSHOP_SQL, params![id as i64])
            .db_context("Failed to delete workshop")?;
        tx.commit().db_context("Failed to commit transaction")?;
        info!("Workshop {id} deleted");
        Ok(workshop)
    }
}
