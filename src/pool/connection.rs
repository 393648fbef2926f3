use std::time::Duration;

use crate::transaction::TxState;
use crate::types::DatabaseType;

/// A connection checked out of the pool for one request.
///
/// The transaction state lives here so a scope opened on this connection can
/// be tracked (and a leaked one detected) without any global bookkeeping.
pub enum DbConnection {
    #[cfg(feature = "postgres")]
    Postgres {
        client: deadpool_postgres::Object,
        tx_state: TxState,
        query_timeout: Option<Duration>,
    },
    #[cfg(feature = "sqlite")]
    Sqlite {
        conn: deadpool_sqlite::Object,
        tx_state: TxState,
        query_timeout: Option<Duration>,
    },
}

// Manual Debug implementation because the pooled objects don't expose Debug
impl std::fmt::Debug for DbConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres { tx_state, .. } => {
                f.debug_struct("Postgres").field("tx_state", tx_state).finish()
            }
            #[cfg(feature = "sqlite")]
            Self::Sqlite { tx_state, .. } => {
                f.debug_struct("Sqlite").field("tx_state", tx_state).finish()
            }
        }
    }
}

impl DbConnection {
    #[cfg(feature = "postgres")]
    pub(crate) fn from_postgres(
        client: deadpool_postgres::Object,
        query_timeout: Option<Duration>,
    ) -> Self {
        Self::Postgres {
            client,
            tx_state: TxState::Idle,
            query_timeout,
        }
    }

    #[cfg(feature = "sqlite")]
    pub(crate) fn from_sqlite(
        conn: deadpool_sqlite::Object,
        query_timeout: Option<Duration>,
    ) -> Self {
        Self::Sqlite {
            conn,
            tx_state: TxState::Idle,
            query_timeout,
        }
    }

    #[must_use]
    pub fn backend(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres { .. } => DatabaseType::Postgres,
            #[cfg(feature = "sqlite")]
            Self::Sqlite { .. } => DatabaseType::Sqlite,
        }
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.tx_state() == TxState::Active
    }

    pub(crate) fn tx_state(&self) -> TxState {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres { tx_state, .. } => *tx_state,
            #[cfg(feature = "sqlite")]
            Self::Sqlite { tx_state, .. } => *tx_state,
        }
    }

    pub(crate) fn set_tx_state(&mut self, state: TxState) {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres { tx_state, .. } => *tx_state = state,
            #[cfg(feature = "sqlite")]
            Self::Sqlite { tx_state, .. } => *tx_state = state,
        }
    }

    pub(crate) fn query_timeout(&self) -> Option<Duration> {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres { query_timeout, .. } => *query_timeout,
            #[cfg(feature = "sqlite")]
            Self::Sqlite { query_timeout, .. } => *query_timeout,
        }
    }
}
