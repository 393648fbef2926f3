use crate::error::DbError;
use crate::results::ResultSet;
use crate::types::SqlValue;

use super::params;
use super::query::build_result_set_from_rows;

/// Execute a batch of SQL statements.
///
/// # Errors
/// Returns `DbError::Postgres` if execution fails.
pub async fn execute_batch(
    client: &deadpool_postgres::Object,
    sql: &str,
) -> Result<(), DbError> {
    client.batch_execute(sql).await?;
    Ok(())
}

/// Execute a SELECT and return the full result set.
///
/// # Errors
/// Returns `DbError::Postgres` if execution or row extraction fails.
pub async fn execute_select(
    client: &deadpool_postgres::Object,
    sql: &str,
    params: &[SqlValue],
) -> Result<ResultSet, DbError> {
    let refs = params::as_refs(params);
    let rows = client.query(sql, &refs).await?;
    build_result_set_from_rows(&rows)
}

/// Execute a DML statement (INSERT, UPDATE, DELETE) and return rows affected.
///
/// # Errors
/// Returns `DbError::Postgres` if execution fails.
pub async fn execute_dml(
    client: &deadpool_postgres::Object,
    sql: &str,
    params: &[SqlValue],
) -> Result<usize, DbError> {
    let refs = params::as_refs(params);
    let affected = client.execute(sql, &refs).await?;
    usize::try_from(affected)
        .map_err(|_| DbError::Execution("rows-affected count overflows usize".to_string()))
}

/// Execute an INSERT and return the storage-assigned id.
///
/// Tables in this application use a serial `id` primary key, so the insert is
/// suffixed with `RETURNING id` to read it back in one round trip.
///
/// # Errors
/// Returns `DbError::Postgres` if execution fails or no id comes back.
pub async fn execute_insert(
    client: &deadpool_postgres::Object,
    sql: &str,
    params: &[SqlValue],
) -> Result<i64, DbError> {
    let refs = params::as_refs(params);
    let sql = format!("{sql} RETURNING id");
    let row = client.query_one(&sql, &refs).await?;
    match row.try_get::<_, i64>(0) {
        Ok(id) => Ok(id),
        Err(_) => {
            let id: i32 = row.try_get(0)?;
            Ok(i64::from(id))
        }
    }
}
