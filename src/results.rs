use std::collections::HashMap;
use std::sync::Arc;

use crate::types::SqlValue;

/// A single row from a query result
///
/// Column names are shared across all rows of a result set, with a cached
/// name-to-index map so repeated lookups avoid string comparisons.
#[derive(Debug, Clone)]
pub struct DbRow {
    columns: Arc<Vec<String>>,
    values: Vec<SqlValue>,
    index: Arc<HashMap<String, usize>>,
}

impl DbRow {
    #[must_use]
    pub fn new(columns: Arc<Vec<String>>, values: Vec<SqlValue>) -> Self {
        let index = Arc::new(
            columns
                .iter()
                .enumerate()
                .map(|(i, name)| (name.clone(), i))
                .collect::<HashMap<_, _>>(),
        );
        Self {
            columns,
            values,
            index,
        }
    }

    fn column_index(&self, column: &str) -> Option<usize> {
        if let Some(&idx) = self.index.get(column) {
            return Some(idx);
        }
        self.columns.iter().position(|name| name == column)
    }

    /// Get a value by column name, or `None` if the column is absent.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.column_index(column)
            .and_then(|idx| self.values.get(idx))
    }

    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }
}

/// The rows returned by a query, plus the affected-row count for DML
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub rows: Vec<DbRow>,
    /// The number of rows returned or affected
    pub rows_affected: usize,
    columns: Option<Arc<Vec<String>>>,
    index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ResultSet {
            rows: Vec::with_capacity(capacity),
            rows_affected: 0,
            columns: None,
            index: None,
        }
    }

    /// Set the column names shared by every row added afterwards.
    pub fn set_columns(&mut self, columns: Vec<String>) {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect::<HashMap<_, _>>();
        self.columns = Some(Arc::new(columns));
        self.index = Some(Arc::new(index));
    }

    #[must_use]
    pub fn column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.columns.as_ref()
    }

    /// Add a row of values, sharing the column metadata set via `set_columns`.
    pub fn push_row(&mut self, values: Vec<SqlValue>) {
        let columns = self
            .columns
            .get_or_insert_with(|| Arc::new(Vec::new()))
            .clone();
        let index = self
            .index
            .get_or_insert_with(|| Arc::new(HashMap::new()))
            .clone();
        self.rows.push(DbRow {
            columns,
            values,
            index,
        });
        self.rows_affected += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&DbRow> {
        self.rows.first()
    }

    /// Consume the set and return its first row, if any.
    #[must_use]
    pub fn into_first(self) -> Option<DbRow> {
        self.rows.into_iter().next()
    }
}
