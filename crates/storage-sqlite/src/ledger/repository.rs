use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable};
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use gullak_core::ledger::{Transaction, TransactionFilter, TransactionRepositoryTrait};
use gullak_core::Result;

use super::model::TransactionDB;
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::transactions;

/// Repository for the append-only transaction ledger.
///
/// Rows are only ever inserted, and only inside a ledger transaction next
/// to the wallet update they describe.
pub struct TransactionRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        TransactionRepository { pool }
    }
}

impl TransactionRepositoryTrait for TransactionRepository {
    fn append_in_transaction(
        &self,
        transaction: &Transaction,
        conn: &mut SqliteConnection,
    ) -> Result<Transaction> {
        let created = diesel::insert_into(transactions::table)
            .values(&TransactionDB::from(transaction))
            .returning(TransactionDB::as_returning())
            .get_result::<TransactionDB>(conn)
            .map_err(StorageError::from)?;
        Ok(created.into())
    }

    fn list_by_user(&self, user_id: &str, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .into_boxed();

        if let Some(type_filter) = filter.transaction_type {
            query = query.filter(transactions::transaction_type.eq(type_filter.as_str()));
        }

        let rows = query
            .select(TransactionDB::as_select())
            .order(transactions::created_at.desc())
            .limit(filter.effective_limit())
            .load::<TransactionDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    fn sum_for_user(&self, user_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        let total = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .select(sql::<Nullable<BigInt>>("SUM(amount)"))
            .first::<Option<i64>>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(total.unwrap_or(0))
    }
}
