use thiserror::Error;

#[cfg(feature = "sqlite")]
use deadpool_sqlite::rusqlite;

/// Unified error type for the data-access layer.
///
/// Driver errors are carried transparently so callers can always reach the
/// underlying failure; routine "no rows" outcomes are never represented here.
#[derive(Debug, Error)]
pub enum DbError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Postgres(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PoolPostgres(#[from] deadpool::managed::PoolError<tokio_postgres::Error>),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    PoolSqlite(#[from] deadpool::managed::PoolError<rusqlite::Error>),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("invalid SQL identifier: {0}")]
    Identifier(String),

    #[error("parameter error: {0}")]
    Parameter(String),

    #[error("transaction state error: {0}")]
    TransactionState(String),

    #[error("statement timed out: {0}")]
    Timeout(String),

    #[error("SQL execution error: {0}")]
    Execution(String),
}

/// What kind of constraint a statement ran into.
///
/// Constraint violations are expected outcomes for user-supplied data (a
/// duplicate email, a dangling foreign key) and callers answer them with a
/// validation message rather than a 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    NotNull,
    Check,
    Other,
}

impl DbError {
    /// Classify a driver error as a constraint violation, if it is one.
    #[must_use]
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            #[cfg(feature = "sqlite")]
            DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Some(match err.extended_code {
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => ConstraintKind::Unique,
                    rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
                    rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL => ConstraintKind::NotNull,
                    rusqlite::ffi::SQLITE_CONSTRAINT_CHECK => ConstraintKind::Check,
                    _ => ConstraintKind::Other,
                })
            }
            #[cfg(feature = "postgres")]
            DbError::Postgres(err) => {
                use tokio_postgres::error::SqlState;
                err.code().and_then(|state| {
                    if *state == SqlState::UNIQUE_VIOLATION {
                        Some(ConstraintKind::Unique)
                    } else if *state == SqlState::FOREIGN_KEY_VIOLATION {
                        Some(ConstraintKind::ForeignKey)
                    } else if *state == SqlState::NOT_NULL_VIOLATION {
                        Some(ConstraintKind::NotNull)
                    } else if *state == SqlState::CHECK_VIOLATION {
                        Some(ConstraintKind::Check)
                    } else if state.code().starts_with("23") {
                        Some(ConstraintKind::Other)
                    } else {
                        None
                    }
                })
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        self.constraint_kind().is_some()
    }
}

#[cfg(feature = "sqlite")]
impl From<deadpool_sqlite::InteractError> for DbError {
    fn from(err: deadpool_sqlite::InteractError) -> Self {
        DbError::Connection(format!("SQLite interact error: {err}"))
    }
}
