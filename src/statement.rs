//! Dynamic INSERT/UPDATE/DELETE synthesis from field maps.
//!
//! Identifiers (table and column names) are the only text spliced into a
//! statement, and each one has to pass [`ensure_identifier`]; values always
//! bind through placeholders. WHERE fragments are statically known strings
//! supplied by the calling model code, never end-user input.

use crate::error::{ConstraintKind, DbError};
use crate::executor::SqlExecutor;
use crate::fields::{FieldMap, ensure_identifier};
use crate::pool::DbConnection;
use crate::translation;
use crate::types::SqlValue;

/// A synthesized statement plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltStatement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// What became of an insert.
///
/// Constraint violations (duplicate key, dangling foreign key) are expected
/// for user-supplied data, so they are a tagged outcome rather than an error;
/// driver failures still surface as `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Row stored; carries the storage-assigned id.
    Created(i64),
    /// The insert hit a constraint and stored nothing.
    Conflict(ConstraintKind),
}

impl InsertOutcome {
    #[must_use]
    pub fn id(self) -> Option<i64> {
        match self {
            InsertOutcome::Created(id) => Some(id),
            InsertOutcome::Conflict(_) => None,
        }
    }

    #[must_use]
    pub fn is_conflict(self) -> bool {
        matches!(self, InsertOutcome::Conflict(_))
    }
}

/// Synthesize `INSERT INTO table (cols...) VALUES (?...)`.
///
/// # Errors
/// Returns `DbError::Identifier` for a bad table or column name and
/// `DbError::Parameter` for an empty field map.
pub fn build_insert(table: &str, fields: &FieldMap) -> Result<BuiltStatement, DbError> {
    ensure_identifier(table)?;
    if fields.is_empty() {
        return Err(DbError::Parameter(format!(
            "insert into {table} requires at least one column"
        )));
    }

    let mut columns = Vec::with_capacity(fields.len());
    for column in fields.columns() {
        ensure_identifier(column)?;
        columns.push(column);
    }
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    );

    Ok(BuiltStatement {
        sql,
        params: fields.values(),
    })
}

/// Synthesize `UPDATE table SET col = ?, ... WHERE <where_clause>`.
///
/// The bound parameter list is the field values in map order followed by
/// `where_params`; the WHERE placeholders come after the SET placeholders in
/// the statement text, so this ordering is what the driver expects.
///
/// # Errors
/// Returns `DbError::Identifier` for a bad identifier, `DbError::Parameter`
/// for an empty field map or a WHERE fragment whose placeholder count does
/// not match `where_params`.
pub fn build_update(
    table: &str,
    fields: &FieldMap,
    where_clause: &str,
    where_params: &[SqlValue],
) -> Result<BuiltStatement, DbError> {
    ensure_identifier(table)?;
    if fields.is_empty() {
        return Err(DbError::Parameter(format!(
            "update of {table} requires at least one column"
        )));
    }
    check_where(where_clause, where_params)?;

    let mut assignments = Vec::with_capacity(fields.len());
    for column in fields.columns() {
        ensure_identifier(column)?;
        assignments.push(format!("{column} = ?"));
    }
    let sql = format!(
        "UPDATE {table} SET {} WHERE {where_clause}",
        assignments.join(", ")
    );

    let mut params = fields.values();
    params.extend_from_slice(where_params);

    Ok(BuiltStatement { sql, params })
}

/// Synthesize `DELETE FROM table WHERE <where_clause>`.
///
/// # Errors
/// Returns `DbError::Identifier` for a bad table name and `DbError::Parameter`
/// for a placeholder/params mismatch in the WHERE fragment.
pub fn build_delete(
    table: &str,
    where_clause: &str,
    where_params: &[SqlValue],
) -> Result<BuiltStatement, DbError> {
    ensure_identifier(table)?;
    check_where(where_clause, where_params)?;

    Ok(BuiltStatement {
        sql: format!("DELETE FROM {table} WHERE {where_clause}"),
        params: where_params.to_vec(),
    })
}

fn check_where(where_clause: &str, where_params: &[SqlValue]) -> Result<(), DbError> {
    let expected = translation::placeholder_count(where_clause);
    if expected != where_params.len() {
        return Err(DbError::Parameter(format!(
            "WHERE fragment has {expected} placeholders but {} parameters were supplied",
            where_params.len()
        )));
    }
    Ok(())
}

/// Build and run an insert, tagging constraint violations as a `Conflict`.
///
/// # Errors
/// Returns `DbError` for statement synthesis failures and driver errors that
/// are not constraint violations.
pub async fn insert(
    conn: &mut DbConnection,
    table: &str,
    fields: &FieldMap,
) -> Result<InsertOutcome, DbError> {
    let built = build_insert(table, fields)?;
    match conn.insert(&built.sql, &built.params).await {
        Ok(id) => Ok(InsertOutcome::Created(id)),
        Err(err) => match err.constraint_kind() {
            Some(kind) => {
                tracing::debug!(table, ?kind, "insert hit a constraint");
                Ok(InsertOutcome::Conflict(kind))
            }
            None => Err(err),
        },
    }
}

/// Build and run an update, returning the number of rows affected.
///
/// # Errors
/// Returns `DbError` for statement synthesis failures and driver errors.
pub async fn update(
    conn: &mut DbConnection,
    table: &str,
    fields: &FieldMap,
    where_clause: &str,
    where_params: &[SqlValue],
) -> Result<usize, DbError> {
    let built = build_update(table, fields, where_clause, where_params)?;
    conn.execute(&built.sql, &built.params).await
}

/// Build and run a delete, returning the number of rows affected.
///
/// Deleting something already gone affects zero rows; that is a normal
/// outcome, not an error.
///
/// # Errors
/// Returns `DbError` for statement synthesis failures and driver errors.
pub async fn delete(
    conn: &mut DbConnection,
    table: &str,
    where_clause: &str,
    where_params: &[SqlValue],
) -> Result<usize, DbError> {
    let built = build_delete(table, where_clause, where_params)?;
    conn.execute(&built.sql, &built.params).await
}
