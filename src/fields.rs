//! Caller-supplied column/value pairs for create and update operations.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::DbError;
use crate::types::SqlValue;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new("^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex");
}

/// Reject anything that is not a plain SQL identifier.
///
/// Values are always bound through placeholders, but table and column names
/// cannot be parameterized by the drivers, so everything interpolated into
/// statement text has to pass this gate.
///
/// # Errors
/// Returns `DbError::Identifier` when `name` is not a bare identifier.
pub fn ensure_identifier(name: &str) -> Result<(), DbError> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(DbError::Identifier(name.to_string()))
    }
}

/// An insertion-ordered mapping of column name to value.
///
/// Order matters: the statement builder binds values positionally in the
/// order the columns were added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: IndexMap<String, SqlValue>,
}

impl FieldMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: SqlValue) -> Self {
        self.entries.insert(column.into(), value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: SqlValue) {
        self.entries.insert(column.into(), value);
    }

    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.entries.contains_key(column)
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.entries.get(column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Clone the values out in insertion order.
    #[must_use]
    pub fn values(&self) -> Vec<SqlValue> {
        self.entries.values().cloned().collect()
    }

    /// Keep only the columns present in `fillable`, preserving order.
    ///
    /// Keys outside the allow-list are dropped silently; callers routinely
    /// pass whole form submissions here.
    #[must_use]
    pub fn filtered(&self, fillable: &[&str]) -> FieldMap {
        let mut kept = IndexMap::new();
        for (column, value) in &self.entries {
            if fillable.contains(&column.as_str()) {
                kept.insert(column.clone(), value.clone());
            } else {
                tracing::debug!(column, "dropping non-fillable column");
            }
        }
        FieldMap { entries: kept }
    }
}

impl FromIterator<(String, SqlValue)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (String, SqlValue)>>(iter: T) -> Self {
        FieldMap {
            entries: iter.into_iter().collect(),
        }
    }
}
