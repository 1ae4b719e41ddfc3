use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use gullak_core::wallets::{Wallet, WalletRepositoryTrait};
use gullak_core::Result;

use super::model::WalletDB;
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::wallets;

/// Repository for wallet rows.
///
/// Balance adjustments only happen inside ledger transactions, so this
/// repository has no standalone write path.
pub struct WalletRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl WalletRepository {
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        WalletRepository { pool }
    }
}

impl WalletRepositoryTrait for WalletRepository {
    fn find_by_user_id(&self, user_id: &str) -> Result<Option<Wallet>> {
        let mut conn = get_connection(&self.pool)?;
        let wallet_db = wallets::table
            .filter(wallets::user_id.eq(user_id))
            .select(WalletDB::as_select())
            .first::<WalletDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(wallet_db.map(Wallet::from))
    }

    fn get_or_create_in_transaction(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        conn: &mut SqliteConnection,
    ) -> Result<Wallet> {
        let existing = wallets::table
            .filter(wallets::user_id.eq(user_id))
            .select(WalletDB::as_select())
            .first::<WalletDB>(conn)
            .optional()
            .map_err(StorageError::from)?;

        if let Some(wallet_db) = existing {
            return Ok(wallet_db.into());
        }

        let wallet = Wallet::new(user_id, now);
        let created = diesel::insert_into(wallets::table)
            .values(&WalletDB::from(&wallet))
            .returning(WalletDB::as_returning())
            .get_result::<WalletDB>(conn)
            .map_err(StorageError::from)?;
        Ok(created.into())
    }

    fn adjust_balance_in_transaction(
        &self,
        user_id: &str,
        delta: i64,
        now: DateTime<Utc>,
        conn: &mut SqliteConnection,
    ) -> Result<Wallet> {
        let updated = diesel::update(wallets::table.filter(wallets::user_id.eq(user_id)))
            .set((
                wallets::balance.eq(wallets::balance + delta),
                wallets::updated_at.eq(now.naive_utc()),
            ))
            .returning(WalletDB::as_returning())
            .get_result::<WalletDB>(conn)
            .map_err(StorageError::from)?;
        Ok(updated.into())
    }
}
