//! Database transaction contract.
//!
//! Every money-movement operation in this crate runs inside a single atomic
//! transaction. Services depend on [`DbTransactionExecutor`] rather than on a
//! concrete pool so the storage wiring stays swappable in tests.

use std::sync::Arc;

use diesel::connection::Connection;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;

use crate::errors::{DatabaseError, Error, Result};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Trait for executing database transactions.
///
/// The closure runs inside one storage transaction: if it returns `Err`, the
/// transaction is rolled back and that same error is returned to the caller.
/// Expected domain failures (insufficient balance, already withdrawn, ...)
/// therefore survive the rollback as typed values rather than surfacing as
/// generic storage errors.
pub trait DbTransactionExecutor {
    /// Execute operations within a transaction and return the result.
    fn execute<F, T, E>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut DbConnection) -> std::result::Result<T, E>,
        E: Into<Error>;
}

/// Implementation of DbTransactionExecutor for DbPool
impl DbTransactionExecutor for DbPool {
    fn execute<F, T, E>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut DbConnection) -> std::result::Result<T, E>,
        E: Into<Error>,
    {
        let mut conn = self.get()?;
        let mut op_error: Option<Error> = None;

        conn.transaction(|tx_conn| {
            f(tx_conn).map_err(|e| {
                // Stash the typed error so it survives the rollback.
                op_error = Some(e.into());
                diesel::result::Error::RollbackTransaction
            })
        })
        .map_err(|e| match op_error.take() {
            Some(err) => err,
            None => Error::Database(DatabaseError::TransactionFailed(e.to_string())),
        })
    }
}

/// Implementation of DbTransactionExecutor for Arc<DbPool>
impl DbTransactionExecutor for Arc<DbPool> {
    fn execute<F, T, E>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut DbConnection) -> std::result::Result<T, E>,
        E: Into<Error>,
    {
        (**self).execute(f)
    }
}
