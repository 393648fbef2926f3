use deadpool_sqlite::rusqlite;

use crate::types::SqlValue;

/// Convert a single `SqlValue` to a rusqlite `Value`.
///
/// Timestamps are stored as text; `SQLite` has no native timestamp type and
/// the `%F %T%.f` shape sorts correctly and parses back via
/// [`SqlValue::as_timestamp`].
#[must_use]
pub fn to_sqlite_value(value: &SqlValue) -> rusqlite::types::Value {
    match value {
        SqlValue::Int(i) => rusqlite::types::Value::Integer(*i),
        SqlValue::Float(f) => rusqlite::types::Value::Real(*f),
        SqlValue::Text(s) => rusqlite::types::Value::Text(s.clone()),
        SqlValue::Bool(b) => rusqlite::types::Value::Integer(i64::from(*b)),
        SqlValue::Timestamp(dt) => {
            rusqlite::types::Value::Text(dt.format("%F %T%.f").to_string())
        }
        SqlValue::Null => rusqlite::types::Value::Null,
        SqlValue::Json(jval) => rusqlite::types::Value::Text(jval.to_string()),
        SqlValue::Blob(bytes) => rusqlite::types::Value::Blob(bytes.clone()),
    }
}

/// Convert a parameter slice into owned `SQLite` values.
#[must_use]
pub fn convert(params: &[SqlValue]) -> Vec<rusqlite::types::Value> {
    params.iter().map(to_sqlite_value).collect()
}
