//! User account queries.

use jiff::Timestamp;
use log::info;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{parsed_at, timestamp_at};
use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::User,
    params::SignupRequest,
};

const INSERT_USER_SQL: &str = "INSERT INTO users (username, email, first_name, last_name, role, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)";
const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, role, is_active, created_at";
const USERNAME_TAKEN_SQL: &str = "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)";
const ACTIVATE_USER_SQL: &str = "UPDATE users SET is_active = 1 WHERE id = ?1";

fn build_user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get::<_, i64>(0)? as u64,
        username: row.get(1)?,
        email: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        role: parsed_at(row, 5)?,
        is_active: row.get(6)?,
        created_at: timestamp_at(row, 7)?,
    })
}

/// Fetch one user over any connection or transaction.
pub(crate) fn fetch_user(conn: &Connection, id: u64) -> Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![id as i64],
        build_user_from_row,
    )
    .optional()
    .db_context("Failed to query user")
}

/// Like [`fetch_user`] but a missing user is an error.
pub(crate) fn require_user(conn: &Connection, id: u64) -> Result<User> {
    fetch_user(conn, id)?.ok_or(WorkflowError::NotFound {
        entity: "User",
        id,
    })
}

impl super::Database {
    /// Registers an inactive account with the requested role.
    pub fn create_user(&mut self, request: &SignupRequest) -> Result<User> {
        request.validate()?;
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let taken: bool = tx
            .query_row(USERNAME_TAKEN_SQL, params![request.username], |row| {
                row.get(0)
            })
            .db_context("Failed to check username")?;
        if taken {
            return Err(WorkflowError::invalid_value("username")
                .with_reason(format!("'{}' is already taken", request.username)));
        }

        let now = Timestamp::now();
        tx.execute(
            INSERT_USER_SQL,
            params![
                request.username,
                request.email,
                request.first_name,
                request.last_name,
                request.role.as_str(),
                now.to_string()
            ],
        )
        .db_context("Failed to insert user")?;
        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;
        info!("Account '{}' requested as {}", request.username, request.role);

        Ok(User {
            id,
            username: request.username.clone(),
            email: request.email.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            role: request.role,
            is_active: false,
            created_at: now,
        })
    }

    /// Marks an account active. Activating an active account is a no-op.
    pub fn activate_user(&mut self, id: u64) -> Result<User> {
        let updated = self
            .connection
            .execute(ACTIVATE_USER_SQL, params![id as i64])
            .db_context("Failed to activate user")?;
        if updated == 0 {
            return Err(WorkflowError::NotFound { entity: "User", id });
        }
        info!("User {id} activated");
        require_user(&self.connection, id)
    }

    pub fn get_user(&self, id: u64) -> Result<Option<User>> {
        fetch_user(&self.connection, id)
    }

    /// Lists accounts by ID, optionally only the active ones.
    pub fn list_users(&self, active_only: bool) -> Result<Vec<User>> {
        let mut query = format!("SELECT {USER_COLUMNS} FROM users");
        if active_only {
            query.push_str(" WHERE is_active = 1");
        }
        query.push_str(" ORDER BY id");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;
        let users = stmt
            .query_map([], build_user_from_row)
            .db_context("Failed to query users")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch users")?;
        Ok(users)
    }
}
