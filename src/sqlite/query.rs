use deadpool_sqlite::rusqlite;
use rusqlite::types::Value;

use crate::error::DbError;
use crate::results::ResultSet;
use crate::types::SqlValue;

/// Extract a `SqlValue` from a `SQLite` row.
///
/// # Errors
/// Returns `DbError::Sqlite` if the value cannot be read.
pub fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<SqlValue, DbError> {
    let value: Value = row.get(idx).map_err(DbError::Sqlite)?;
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Int(i),
        Value::Real(f) => SqlValue::Float(f),
        Value::Text(s) => SqlValue::Text(s),
        Value::Blob(b) => SqlValue::Blob(b),
    })
}

/// Run a prepared statement and collect every row into a `ResultSet`.
///
/// # Errors
/// Returns `DbError::Sqlite` if query execution or row extraction fails.
pub fn build_result_set(
    stmt: &mut rusqlite::Statement,
    params: &[Value],
) -> Result<ResultSet, DbError> {
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let column_count = columns.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_columns(columns);

    let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            values.push(extract_value(row, idx)?);
        }
        result_set.push_row(values);
    }

    Ok(result_set)
}
