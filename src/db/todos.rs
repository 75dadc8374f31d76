//! Todo CRUD operations.
//!
//! Each public method runs in its own transaction (see
//! [`Database::with_transaction`]). Input is validated before the
//! transaction opens, so a validation error never reaches SQLite.

use super::{Database, now_ms};
use crate::error::{StoreError, StoreResult};
use crate::types::{NewTodo, Todo, TodoUpdate};
use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, Row, params, params_from_iter};
use tracing::debug;

const SELECT_TODO: &str = "SELECT id, title, description, priority, is_complete, created_at, updated_at
     FROM todos";

/// Newest first. Ids break ties between rows created in the same millisecond.
const ORDER_NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

fn conversion_error(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, message.into())
}

fn ms_to_datetime(column: usize, ms: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| conversion_error(column, format!("timestamp out of range: {}", ms)))
}

pub fn parse_todo_row(row: &Row) -> rusqlite::Result<Todo> {
    let priority: String = row.get("priority")?;
    let created_at: i64 = row.get("created_at")?;
    let updated_at: i64 = row.get("updated_at")?;

    Ok(Todo {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority: priority.parse().map_err(|e| conversion_error(3, e))?,
        is_complete: row.get("is_complete")?,
        created_at: ms_to_datetime(5, created_at)?,
        updated_at: ms_to_datetime(6, updated_at)?,
    })
}

/// Internal helper to get a todo using an existing connection (avoids deadlock).
fn get_todo_internal(conn: &Connection, todo_id: i64) -> StoreResult<Option<Todo>> {
    let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_TODO))?;

    let result = stmt.query_row(params![todo_id], parse_todo_row);

    match result {
        Ok(todo) => Ok(Some(todo)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn require_todo(conn: &Connection, todo_id: i64) -> StoreResult<Todo> {
    get_todo_internal(conn, todo_id)?.ok_or(StoreError::TodoNotFound(todo_id))
}

/// Apply the supplied fields of `update` in a single UPDATE statement.
fn apply_update(conn: &Connection, todo_id: i64, update: &TodoUpdate) -> StoreResult<Todo> {
    let current = require_todo(conn, todo_id)?;
    if update.is_empty() {
        return Ok(current);
    }

    let mut assignments: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(title) = &update.title {
        assignments.push("title = ?");
        values.push(Value::Text(title.clone()));
    }
    if let Some(description) = &update.description {
        assignments.push("description = ?");
        values.push(description.clone().map_or(Value::Null, Value::Text));
    }
    if let Some(priority) = update.priority {
        assignments.push("priority = ?");
        values.push(Value::Text(priority.as_str().to_string()));
    }
    if let Some(is_complete) = update.is_complete {
        assignments.push("is_complete = ?");
        values.push(Value::Integer(i64::from(is_complete)));
    }
    assignments.push("updated_at = ?");
    values.push(Value::Integer(now_ms()));
    values.push(Value::Integer(todo_id));

    let sql = format!("UPDATE todos SET {} WHERE id = ?", assignments.join(", "));
    conn.execute(&sql, params_from_iter(values))?;

    require_todo(conn, todo_id)
}

impl Database {
    /// Create a new todo. Both timestamps start out equal.
    pub fn create_todo(&self, new_todo: NewTodo) -> StoreResult<Todo> {
        new_todo.validate()?;

        let todo = self.with_transaction(|tx| {
            let now = now_ms();
            tx.execute(
                "INSERT INTO todos (title, description, priority, is_complete, created_at, updated_at)
                 VALUES (?1, ?2, ?3, 0, ?4, ?4)",
                params![
                    new_todo.title,
                    new_todo.description,
                    new_todo.priority.as_str(),
                    now
                ],
            )?;
            require_todo(tx, tx.last_insert_rowid())
        })?;

        debug!(id = todo.id, priority = %todo.priority, "Todo created");
        Ok(todo)
    }

    /// List todos newest first, optionally filtered by completion state.
    pub fn list_todos(&self, is_complete: Option<bool>) -> StoreResult<Vec<Todo>> {
        self.with_transaction(|tx| {
            let todos = match is_complete {
                Some(flag) => {
                    let mut stmt = tx.prepare(&format!(
                        "{} WHERE is_complete = ?1 {}",
                        SELECT_TODO, ORDER_NEWEST_FIRST
                    ))?;
                    let rows = stmt
                        .query_map(params![flag], parse_todo_row)?
                        .collect::<rusqlite::Result<Vec<_>>>()?;
                    rows
                }
                None => {
                    let mut stmt =
                        tx.prepare(&format!("{} {}", SELECT_TODO, ORDER_NEWEST_FIRST))?;
                    let rows = stmt
                        .query_map([], parse_todo_row)?
                        .collect::<rusqlite::Result<Vec<_>>>()?;
                    rows
                }
            };
            Ok(todos)
        })
    }

    /// Get a todo by id.
    pub fn get_todo(&self, todo_id: i64) -> StoreResult<Todo> {
        self.with_transaction(|tx| require_todo(tx, todo_id))
    }

    /// Full update (`PUT`). Applies the supplied fields only.
    pub fn replace_todo(&self, todo_id: i64, update: &TodoUpdate) -> StoreResult<Todo> {
        update.validate()?;
        let todo = self.with_transaction(|tx| apply_update(tx, todo_id, update))?;
        debug!(id = todo_id, "Todo replaced");
        Ok(todo)
    }

    /// Partial update (`PATCH`). Applies the supplied fields only.
    pub fn merge_todo(&self, todo_id: i64, update: &TodoUpdate) -> StoreResult<Todo> {
        update.validate()?;
        let todo = self.with_transaction(|tx| apply_update(tx, todo_id, update))?;
        debug!(id = todo_id, "Todo merged");
        Ok(todo)
    }

    /// Delete a todo permanently. Its id is never handed out again.
    pub fn delete_todo(&self, todo_id: i64) -> StoreResult<()> {
        self.with_transaction(|tx| {
            let deleted = tx.execute("DELETE FROM todos WHERE id = ?1", params![todo_id])?;
            if deleted == 0 {
                return Err(StoreError::TodoNotFound(todo_id));
            }
            Ok(())
        })?;
        debug!(id = todo_id, "Todo deleted");
        Ok(())
    }

    /// Set the completion flag. Setting the current value is a no-op.
    pub fn set_completion(&self, todo_id: i64, is_complete: bool) -> StoreResult<Todo> {
        self.with_transaction(|tx| {
            let current = require_todo(tx, todo_id)?;
            if current.is_complete == is_complete {
                return Ok(current);
            }

            tx.execute(
                "UPDATE todos SET is_complete = ?1, updated_at = ?2 WHERE id = ?3",
                params![is_complete, now_ms(), todo_id],
            )?;
            debug!(id = todo_id, is_complete, "Todo completion updated");
            require_todo(tx, todo_id)
        })
    }

    /// Total and completed todo counts.
    pub fn count_todos(&self) -> StoreResult<(i64, i64)> {
        self.with_transaction(|tx| {
            let counts = tx.query_row(
                "SELECT COUNT(*), COALESCE(SUM(is_complete), 0) FROM todos",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            Ok(counts)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_unknown_priority() {
        let db = Database::open_in_memory().unwrap();
        let result = db.with_transaction(|tx| {
            // Bypass the CHECK constraint to simulate a corrupt row.
            tx.execute_batch("PRAGMA ignore_check_constraints = ON;")?;
            tx.execute(
                "INSERT INTO todos (title, priority, created_at, updated_at)
                 VALUES ('bad', 'urgent', 0, 0)",
                [],
            )?;
            require_todo(tx, tx.last_insert_rowid())
        });
        assert!(matches!(result, Err(StoreError::Database(_))));
    }

    #[test]
    fn test_failed_read_leaves_connection_usable() {
        let db = Database::open_in_memory().unwrap();
        db.with_transaction(|tx| {
            tx.execute_batch("PRAGMA ignore_check_constraints = ON;")?;
            tx.execute(
                "INSERT INTO todos (title, priority, created_at, updated_at)
                 VALUES ('bad', 'urgent', 0, 0)",
                [],
            )?;
            tx.execute_batch("PRAGMA ignore_check_constraints = OFF;")?;
            Ok(())
        })
        .unwrap();

        assert!(matches!(db.list_todos(None), Err(StoreError::Database(_))));
        assert!(matches!(db.get_todo(1), Err(StoreError::Database(_))));

        // Each failed read was rolled back, so writes still go through.
        db.create_todo(NewTodo::new("after")).unwrap();
        assert_eq!(db.count_todos().unwrap(), (2, 0));
    }

    #[test]
    fn test_count_todos_empty() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.count_todos().unwrap(), (0, 0));
    }
}
