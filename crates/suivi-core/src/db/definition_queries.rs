//! Step definition queries: the ordered workflow template.

use rusqlite::{Connection, Row, params};

use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::StepDefinition,
    params::CreateStepDefinition,
};

const INSERT_DEFINITION_SQL: &str = "INSERT INTO step_definitions (name, description, instructions, step_order) VALUES (?1, ?2, ?3, ?4)";
const ORDER_TAKEN_SQL: &str = "SELECT EXISTS(SELECT 1 FROM step_definitions WHERE step_order = ?1)";
const SELECT_DEFINITIONS_SQL: &str = "SELECT id, name, description, instructions, step_order FROM step_definitions ORDER BY step_order";

/// Build a definition from `id, name, description, instructions, step_order`
/// starting at `idx`.
pub(crate) fn build_definition_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<StepDefinition> {
    Ok(StepDefinition {
        id: row.get::<_, i64>(idx)? as u64,
        name: row.get(idx + 1)?,
        description: row.get(idx + 2)?,
        instructions: row.get(idx + 3)?,
        order: row.get(idx + 4)?,
    })
}

pub(crate) fn fetch_definitions(conn: &Connection) -> Result<Vec<StepDefinition>> {
    let mut stmt = conn
        .prepare(SELECT_DEFINITIONS_SQL)
        .db_context("Failed to prepare query")?;
    let definitions = stmt
        .query_map([], |row| build_definition_at(row, 0))
        .db_context("Failed to query step definitions")?
        .collect::<std::result::Result<Vec<_>, _>>()
        .db_context("Failed to fetch step definitions")?;
    Ok(definitions)
}

impl super::Database {
    /// Adds a step to the template. Orders must be unique.
    pub fn create_step_definition(
        &mut self,
        params: &CreateStepDefinition,
    ) -> Result<StepDefinition> {
        params.validate()?;
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let taken: bool = tx
            .query_row(ORDER_TAKEN_SQL, params![params.order], |row| row.get(0))
            .db_context("Failed to check step order")?;
        if taken {
            return Err(WorkflowError::invalid_value("order")
                .with_reason(format!("a step already has order {}", params.order)));
        }

        let description = params.description.clone().unwrap_or_default();
        let instructions = params.instructions.clone().unwrap_or_default();
        tx.execute(
            INSERT_DEFINITION_SQL,
            params![
                params.name.trim(),
                description,
                instructions,
                params.order
            ],
        )
        .db_context("Failed to insert step definition")?;
        let id = tx.last_insert_rowid() as u64;
        tx.commit().db_context("Failed to commit transaction")?;

        Ok(StepDefinition {
            id,
            name: params.name.trim().to_string(),
            description,
            instructions,
            order: params.order,
        })
    }

    /// Lists the template in checklist order.
    pub fn list_step_definitions(&self) -> Result<Vec<StepDefinition>> {
        fetch_definitions(&self.connection)
    }
}
