//! Connection pooling and the process-wide database handle.
//!
//! One [`Database`] is constructed at startup from a [`DbConfig`] and handed
//! (cloned) to whatever needs data access; there is no global. Each request
//! checks a [`DbConnection`] out of the pool and returns it by dropping it,
//! so transaction state never leaks across requests.

pub mod connection;

pub use connection::DbConnection;

use crate::config::DbConfig;
use crate::error::DbError;
use crate::executor::SqlExecutor;
use crate::types::DatabaseType;

use std::time::Duration;

/// Connection pool for database access
///
/// This enum wraps the pool types for the supported backends.
#[derive(Clone)]
pub enum DatabasePool {
    /// `PostgreSQL` connection pool
    #[cfg(feature = "postgres")]
    Postgres(deadpool_postgres::Pool),
    /// `SQLite` connection pool
    #[cfg(feature = "sqlite")]
    Sqlite(deadpool_sqlite::Pool),
}

// Manual Debug implementation because the pool managers don't implement Debug
impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => f.debug_tuple("Postgres").finish(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => f.debug_tuple("Sqlite").finish(),
        }
    }
}

/// The process-wide handle to the configured database.
///
/// Cheap to clone; all clones share one pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: DatabasePool,
    db_type: DatabaseType,
    query_timeout: Option<Duration>,
}

impl Database {
    /// Build the pool for the configured backend and verify it with one
    /// checkout.
    ///
    /// A failure here is fatal to startup: the application cannot serve any
    /// request without its database, so no retry is attempted.
    ///
    /// # Errors
    /// Returns `DbError::Config` for an incomplete config and
    /// `DbError::Connection` when the pool cannot be created or the smoke
    /// test fails.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        config.validate()?;

        let pool = match config.backend {
            DatabaseType::Postgres => {
                #[cfg(feature = "postgres")]
                {
                    let mut pg = deadpool_postgres::Config::new();
                    pg.host = config.host.clone();
                    pg.port = config.port;
                    pg.user = config.user.clone();
                    pg.password = config.password.clone();
                    pg.dbname = config.dbname.clone();
                    if let Some(charset) = &config.charset {
                        pg.options = Some(format!("-c client_encoding={charset}"));
                    }
                    pg.pool = Some(deadpool::managed::PoolConfig::new(config.pool_size));
                    let pool = pg
                        .create_pool(
                            Some(deadpool_postgres::Runtime::Tokio1),
                            tokio_postgres::NoTls,
                        )
                        .map_err(|e| {
                            DbError::Connection(format!("failed to create postgres pool: {e}"))
                        })?;
                    DatabasePool::Postgres(pool)
                }
                #[cfg(not(feature = "postgres"))]
                {
                    return Err(DbError::Config(
                        "postgres backend requested but the `postgres` feature is disabled"
                            .to_string(),
                    ));
                }
            }
            DatabaseType::Sqlite => {
                #[cfg(feature = "sqlite")]
                {
                    let path = config.path.clone().unwrap_or_default();
                    let mut cfg = deadpool_sqlite::Config::new(path);
                    cfg.pool = Some(deadpool::managed::PoolConfig::new(config.pool_size));
                    let pool = cfg
                        .create_pool(deadpool_sqlite::Runtime::Tokio1)
                        .map_err(|e| {
                            DbError::Connection(format!("failed to create sqlite pool: {e}"))
                        })?;
                    DatabasePool::Sqlite(pool)
                }
                #[cfg(not(feature = "sqlite"))]
                {
                    return Err(DbError::Config(
                        "sqlite backend requested but the `sqlite` feature is disabled".to_string(),
                    ));
                }
            }
        };

        let db = Database {
            pool,
            db_type: config.backend,
            query_timeout: config.query_timeout(),
        };

        db.smoke_test().await?;
        tracing::info!(backend = ?db.db_type, pool_size = config.pool_size, "database pool initialized");
        Ok(db)
    }

    /// One checkout plus a trivial statement so misconfiguration surfaces at
    /// startup instead of on the first request.
    async fn smoke_test(&self) -> Result<(), DbError> {
        let mut conn = self.acquire().await?;
        match conn.backend() {
            DatabaseType::Sqlite => {
                conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
                    .await
            }
            DatabaseType::Postgres => conn.fetch_all("SELECT 1", &[]).await.map(|_| ()),
        }
    }

    /// Check a connection out of the pool for the duration of one request.
    ///
    /// # Errors
    /// Returns the pool error when no connection can be provided.
    pub async fn acquire(&self) -> Result<DbConnection, DbError> {
        match &self.pool {
            #[cfg(feature = "postgres")]
            DatabasePool::Postgres(pool) => {
                let client = pool.get().await?;
                Ok(DbConnection::from_postgres(client, self.query_timeout))
            }
            #[cfg(feature = "sqlite")]
            DatabasePool::Sqlite(pool) => {
                let conn = pool.get().await?;
                Ok(DbConnection::from_sqlite(conn, self.query_timeout))
            }
        }
    }

    #[must_use]
    pub fn backend(&self) -> DatabaseType {
        self.db_type
    }
}
