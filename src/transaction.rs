//! Transaction control over one checked-out connection.
//!
//! The state machine is `Idle → Active → {committed, rolled back} → Idle`.
//! Nested scopes are not supported: `begin` on an Active connection fails
//! loudly instead of silently piling up. Savepoints are a deliberate
//! non-extension of this design.

use crate::error::DbError;
use crate::executor::SqlExecutor;
use crate::pool::DbConnection;

/// Transaction state carried by a checked-out connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxState {
    #[default]
    Idle,
    Active,
}

impl DbConnection {
    /// Open a transaction: Idle → Active.
    ///
    /// # Errors
    /// Returns `DbError::TransactionState` if a scope is already active on
    /// this connection.
    pub async fn begin_transaction(&mut self) -> Result<(), DbError> {
        if self.in_transaction() {
            return Err(DbError::TransactionState(
                "begin called while a transaction is already active".to_string(),
            ));
        }
        self.execute_batch("BEGIN").await?;
        self.set_tx_state(TxState::Active);
        Ok(())
    }

    /// Commit the open transaction: Active → Idle.
    ///
    /// # Errors
    /// Returns `DbError::TransactionState` if no scope is active, or the
    /// driver error if COMMIT itself fails (the scope is rolled back in that
    /// case so the connection goes back to the pool clean).
    pub async fn commit_transaction(&mut self) -> Result<(), DbError> {
        if !self.in_transaction() {
            return Err(DbError::TransactionState(
                "commit called with no active transaction".to_string(),
            ));
        }
        if let Err(err) = self.execute_batch("COMMIT").await {
            self.rollback_transaction().await;
            return Err(err);
        }
        self.set_tx_state(TxState::Idle);
        Ok(())
    }

    /// Roll back the open transaction: Active → Idle. Best-effort.
    ///
    /// Never returns an error: this runs on failure paths where the original
    /// error is the one that must propagate, so secondary failures are logged
    /// and suppressed. Rolling back with no active scope is a caller bug and
    /// is logged as such.
    pub async fn rollback_transaction(&mut self) {
        if !self.in_transaction() {
            tracing::warn!("rollback called with no active transaction");
            return;
        }
        if let Err(err) = self.execute_batch("ROLLBACK").await {
            tracing::warn!(error = %err, "rollback failed");
        }
        self.set_tx_state(TxState::Idle);
    }
}

/// An owned transaction scope.
///
/// Takes the connection for the duration of the scope and hands it back on
/// [`commit`](Transaction::commit) or [`rollback`](Transaction::rollback).
/// A scope that is simply dropped rolls back in the background; that path is
/// a leak in the calling code and is logged as one.
pub struct Transaction {
    conn: Option<DbConnection>,
}

impl Transaction {
    /// Begin a scope on the given connection.
    ///
    /// # Errors
    /// Returns `DbError::TransactionState` if the connection already has an
    /// active scope, or the driver error if BEGIN fails.
    pub async fn begin(mut conn: DbConnection) -> Result<Self, DbError> {
        conn.begin_transaction().await?;
        Ok(Self { conn: Some(conn) })
    }

    /// Borrow the connection to run statements inside the scope.
    ///
    /// # Errors
    /// Returns `DbError::TransactionState` if the scope has already
    /// completed.
    pub fn executor(&mut self) -> Result<&mut DbConnection, DbError> {
        self.conn.as_mut().ok_or_else(|| {
            DbError::TransactionState("transaction scope already completed".to_string())
        })
    }

    /// Commit and return the connection.
    ///
    /// # Errors
    /// Returns `DbError::TransactionState` if the scope already completed, or
    /// the driver error if COMMIT fails.
    pub async fn commit(mut self) -> Result<DbConnection, DbError> {
        let mut conn = self.conn.take().ok_or_else(|| {
            DbError::TransactionState("transaction scope already completed".to_string())
        })?;
        conn.commit_transaction().await?;
        Ok(conn)
    }

    /// Roll back and return the connection. Best-effort; never fails on the
    /// rollback itself.
    ///
    /// # Errors
    /// Returns `DbError::TransactionState` only if the scope already
    /// completed.
    pub async fn rollback(mut self) -> Result<DbConnection, DbError> {
        let mut conn = self.conn.take().ok_or_else(|| {
            DbError::TransactionState("transaction scope already completed".to_string())
        })?;
        conn.rollback_transaction().await;
        Ok(conn)
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if let Some(mut conn) = self.conn.take()
            && let Ok(handle) = tokio::runtime::Handle::try_current()
        {
            tracing::warn!("transaction scope dropped while active; rolling back");
            handle.spawn(async move {
                conn.rollback_transaction().await;
            });
        }
    }
}
