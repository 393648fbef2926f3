use deadpool_sqlite::rusqlite;

use crate::error::DbError;
use crate::results::ResultSet;
use crate::types::SqlValue;

use super::params;
use super::query::build_result_set;

/// Execute a batch of SQL statements using auto-commit.
///
/// # Errors
/// Returns `DbError` if execution fails.
pub async fn execute_batch(
    client: &deadpool_sqlite::Object,
    sql: &str,
) -> Result<(), DbError> {
    let sql = sql.to_owned();
    client
        .interact(move |conn| conn.execute_batch(&sql).map_err(DbError::Sqlite))
        .await?
}

/// Execute a SELECT and return the full result set.
///
/// # Errors
/// Returns `DbError` if preparation, execution, or row extraction fails.
pub async fn execute_select(
    client: &deadpool_sqlite::Object,
    sql: &str,
    params: &[SqlValue],
) -> Result<ResultSet, DbError> {
    let sql = sql.to_owned();
    let values = params::convert(params);
    client
        .interact(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            build_result_set(&mut stmt, &values)
        })
        .await?
}

/// Execute a DML statement (INSERT, UPDATE, DELETE) and return rows affected.
///
/// # Errors
/// Returns `DbError` if preparation or execution fails.
pub async fn execute_dml(
    client: &deadpool_sqlite::Object,
    sql: &str,
    params: &[SqlValue],
) -> Result<usize, DbError> {
    let sql = sql.to_owned();
    let values = params::convert(params);
    client
        .interact(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let affected = stmt.execute(rusqlite::params_from_iter(values.iter()))?;
            Ok(affected)
        })
        .await?
}

/// Execute an INSERT and return the storage-assigned row id.
///
/// # Errors
/// Returns `DbError` if preparation or execution fails.
pub async fn execute_insert(
    client: &deadpool_sqlite::Object,
    sql: &str,
    params: &[SqlValue],
) -> Result<i64, DbError> {
    let sql = sql.to_owned();
    let values = params::convert(params);
    client
        .interact(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            stmt.execute(rusqlite::params_from_iter(values.iter()))?;
            Ok(conn.last_insert_rowid())
        })
        .await?
}
