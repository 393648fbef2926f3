//! The single execution primitive every data-access call goes through.
//!
//! Statement text reaching this layer contains `?` placeholders and no value
//! literals; values travel exclusively through the `params` slice. The
//! statement text is therefore safe to log, and parameter values never are.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::DbError;
use crate::pool::DbConnection;
use crate::results::{DbRow, ResultSet};
use crate::translation::{self, PlaceholderStyle};
use crate::types::SqlValue;

/// Parameterized statement execution against one checked-out connection.
#[async_trait]
pub trait SqlExecutor {
    /// Execute a batch of statements (DDL, bootstrap scripts). No parameters.
    async fn execute_batch(&mut self, sql: &str) -> Result<(), DbError>;

    /// Execute a SELECT and return every row; an empty set is not an error.
    async fn fetch_all(&mut self, sql: &str, params: &[SqlValue])
    -> Result<ResultSet, DbError>;

    /// Execute a SELECT and return the first row, or `None` for zero rows.
    async fn fetch_one(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<DbRow>, DbError>;

    /// Execute a DML statement and return the number of rows affected.
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<usize, DbError>;

    /// Execute an INSERT and return the storage-assigned id.
    async fn insert(&mut self, sql: &str, params: &[SqlValue]) -> Result<i64, DbError>;
}

fn check_placeholders(sql: &str, params: &[SqlValue]) -> Result<(), DbError> {
    let expected = translation::placeholder_count(sql);
    if expected != params.len() {
        return Err(DbError::Parameter(format!(
            "statement has {expected} placeholders but {} parameters were supplied",
            params.len()
        )));
    }
    Ok(())
}

async fn with_deadline<T, F>(
    deadline: Option<Duration>,
    sql: &str,
    fut: F,
) -> Result<T, DbError>
where
    F: Future<Output = Result<T, DbError>> + Send,
{
    match deadline {
        None => fut.await,
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| DbError::Timeout(sql.to_string()))?,
    }
}

#[async_trait]
impl SqlExecutor for DbConnection {
    async fn execute_batch(&mut self, sql: &str) -> Result<(), DbError> {
        tracing::debug!(sql, "execute_batch");
        let deadline = self.query_timeout();
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres { client, .. } => {
                with_deadline(deadline, sql, crate::postgres::execute_batch(client, sql)).await
            }
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite { conn, .. } => {
                with_deadline(deadline, sql, crate::sqlite::execute_batch(conn, sql)).await
            }
        }
    }

    async fn fetch_all(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ResultSet, DbError> {
        check_placeholders(sql, params)?;
        tracing::debug!(sql, "fetch_all");
        let deadline = self.query_timeout();
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres { client, .. } => {
                let translated = translation::translate_placeholders(sql, PlaceholderStyle::Postgres);
                with_deadline(
                    deadline,
                    sql,
                    crate::postgres::execute_select(client, translated.as_ref(), params),
                )
                .await
            }
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite { conn, .. } => {
                with_deadline(deadline, sql, crate::sqlite::execute_select(conn, sql, params))
                    .await
            }
        }
    }

    async fn fetch_one(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<Option<DbRow>, DbError> {
        let result_set = self.fetch_all(sql, params).await?;
        Ok(result_set.into_first())
    }

    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<usize, DbError> {
        check_placeholders(sql, params)?;
        tracing::debug!(sql, "execute");
        let deadline = self.query_timeout();
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres { client, .. } => {
                let translated = translation::translate_placeholders(sql, PlaceholderStyle::Postgres);
                with_deadline(
                    deadline,
                    sql,
                    crate::postgres::execute_dml(client, translated.as_ref(), params),
                )
                .await
            }
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite { conn, .. } => {
                with_deadline(deadline, sql, crate::sqlite::execute_dml(conn, sql, params)).await
            }
        }
    }

    async fn insert(&mut self, sql: &str, params: &[SqlValue]) -> Result<i64, DbError> {
        check_placeholders(sql, params)?;
        tracing::debug!(sql, "insert");
        let deadline = self.query_timeout();
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres { client, .. } => {
                let translated = translation::translate_placeholders(sql, PlaceholderStyle::Postgres);
                with_deadline(
                    deadline,
                    sql,
                    crate::postgres::execute_insert(client, translated.as_ref(), params),
                )
                .await
            }
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite { conn, .. } => {
                with_deadline(deadline, sql, crate::sqlite::execute_insert(conn, sql, params))
                    .await
            }
        }
    }
}
