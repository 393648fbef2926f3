use std::time::Duration;

use serde::Deserialize;

use crate::error::DbError;
use crate::types::DatabaseType;

fn default_pool_size() -> usize {
    8
}

/// Connection settings supplied at process start.
///
/// A config that cannot produce a working pool is a startup failure; nothing
/// in this crate retries or degrades when the database is unreachable.
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub backend: DatabaseType,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub dbname: Option<String>,
    /// Client encoding, applied where the backend supports it.
    #[serde(default)]
    pub charset: Option<String>,
    /// Path or URI for `SQLite` databases.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Upper bound for a single statement, in milliseconds. Unset means no
    /// deadline.
    #[serde(default)]
    pub query_timeout_ms: Option<u64>,
}

impl DbConfig {
    #[must_use]
    pub fn postgres(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        dbname: impl Into<String>,
    ) -> Self {
        Self {
            backend: DatabaseType::Postgres,
            host: Some(host.into()),
            port: Some(5432),
            user: Some(user.into()),
            password: Some(password.into()),
            dbname: Some(dbname.into()),
            charset: None,
            path: None,
            pool_size: default_pool_size(),
            query_timeout_ms: None,
        }
    }

    #[must_use]
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            backend: DatabaseType::Sqlite,
            host: None,
            port: None,
            user: None,
            password: None,
            dbname: None,
            charset: None,
            path: Some(path.into()),
            pool_size: default_pool_size(),
            query_timeout_ms: None,
        }
    }

    /// A named shared in-memory `SQLite` database. Connections from one pool
    /// all see the same data; distinct names give isolated databases, which
    /// is what tests want.
    #[must_use]
    pub fn sqlite_in_memory(name: &str) -> Self {
        Self::sqlite(format!("file:{name}?mode=memory&cache=shared"))
    }

    #[must_use]
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    #[must_use]
    pub fn with_query_timeout(mut self, limit: Duration) -> Self {
        self.query_timeout_ms = Some(u64::try_from(limit.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub(crate) fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.map(Duration::from_millis)
    }

    /// Check that the required fields for the selected backend are present.
    ///
    /// # Errors
    /// Returns `DbError::Config` naming the first missing field.
    pub fn validate(&self) -> Result<(), DbError> {
        match self.backend {
            DatabaseType::Postgres => {
                for (field, value) in [
                    ("host", &self.host),
                    ("user", &self.user),
                    ("dbname", &self.dbname),
                ] {
                    if value.as_deref().is_none_or(str::is_empty) {
                        return Err(DbError::Config(format!(
                            "postgres configuration is missing `{field}`"
                        )));
                    }
                }
                Ok(())
            }
            DatabaseType::Sqlite => {
                if self.path.as_deref().is_none_or(str::is_empty) {
                    return Err(DbError::Config(
                        "sqlite configuration is missing `path`".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}
