//! Generic per-entity CRUD over one table.
//!
//! Domain entities (schools, users, classes, grades, ...) each declare an
//! [`EntityDef`] naming their table and writable columns, and get a uniform
//! accessor with no per-entity SQL. Entity-specific queries live with the
//! entities, outside this crate, built on the same executor.

use crate::error::DbError;
use crate::executor::SqlExecutor;
use crate::fields::{FieldMap, ensure_identifier};
use crate::pool::DbConnection;
use crate::results::DbRow;
use crate::statement::{self, InsertOutcome};
use crate::types::SqlValue;

/// Static description of one entity's table.
#[derive(Debug, Clone, Copy)]
pub struct EntityDef {
    pub table: &'static str,
    /// Columns external callers are allowed to set. Everything else in a
    /// submitted field map is dropped before it can reach statement text.
    pub fillable: &'static [&'static str],
}

impl EntityDef {
    #[must_use]
    pub const fn new(table: &'static str, fillable: &'static [&'static str]) -> Self {
        Self { table, fillable }
    }

    #[must_use]
    pub fn is_fillable(&self, column: &str) -> bool {
        self.fillable.contains(&column)
    }
}

/// CRUD accessor for one entity on one checked-out connection.
pub struct Repository<'c> {
    conn: &'c mut DbConnection,
    entity: &'static EntityDef,
}

impl<'c> Repository<'c> {
    #[must_use]
    pub fn new(conn: &'c mut DbConnection, entity: &'static EntityDef) -> Self {
        Self { conn, entity }
    }

    #[must_use]
    pub fn entity(&self) -> &'static EntityDef {
        self.entity
    }

    /// Look a row up by primary key.
    ///
    /// # Errors
    /// Returns `DbError` on driver failure; a missing row is `Ok(None)`.
    pub async fn find(&mut self, id: i64) -> Result<Option<DbRow>, DbError> {
        ensure_identifier(self.entity.table)?;
        let sql = format!("SELECT * FROM {} WHERE id = ?", self.entity.table);
        self.conn.fetch_one(&sql, &[SqlValue::Int(id)]).await
    }

    /// First row where `column = value`; used for unique-ish lookups like
    /// email.
    ///
    /// # Errors
    /// Returns `DbError::Identifier` when `column` is neither `id` nor on the
    /// entity's allow-list, or `DbError` on driver failure.
    pub async fn find_by(
        &mut self,
        column: &str,
        value: SqlValue,
    ) -> Result<Option<DbRow>, DbError> {
        if column != "id" && !self.entity.is_fillable(column) {
            return Err(DbError::Identifier(column.to_string()));
        }
        ensure_identifier(self.entity.table)?;
        ensure_identifier(column)?;
        let sql = format!(
            "SELECT * FROM {} WHERE {column} = ? LIMIT 1",
            self.entity.table
        );
        self.conn.fetch_one(&sql, &[value]).await
    }

    /// Insert a new row from the fillable subset of `fields`.
    ///
    /// # Errors
    /// Returns `DbError` for driver failures; constraint violations come back
    /// as `Ok(InsertOutcome::Conflict(_))`.
    pub async fn create(&mut self, fields: &FieldMap) -> Result<InsertOutcome, DbError> {
        let filtered = fields.filtered(self.entity.fillable);
        statement::insert(self.conn, self.entity.table, &filtered).await
    }

    /// Update the row with the given id from the fillable subset of `fields`.
    ///
    /// Returns `true` when a row changed. An update whose field map filters
    /// down to nothing touches nothing and returns `false`.
    ///
    /// # Errors
    /// Returns `DbError` on driver failure.
    pub async fn update(&mut self, id: i64, fields: &FieldMap) -> Result<bool, DbError> {
        let filtered = fields.filtered(self.entity.fillable);
        if filtered.is_empty() {
            tracing::debug!(table = self.entity.table, id, "update had no fillable columns");
            return Ok(false);
        }
        let affected = statement::update(
            self.conn,
            self.entity.table,
            &filtered,
            "id = ?",
            &[SqlValue::Int(id)],
        )
        .await?;
        Ok(affected > 0)
    }

    /// Delete the row with the given id, returning rows affected.
    ///
    /// Deleting an id that is already gone affects zero rows and is not an
    /// error.
    ///
    /// # Errors
    /// Returns `DbError` on driver failure.
    pub async fn delete(&mut self, id: i64) -> Result<usize, DbError> {
        statement::delete(self.conn, self.entity.table, "id = ?", &[SqlValue::Int(id)]).await
    }
}
