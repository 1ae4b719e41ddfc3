use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use gullak_core::savings::{
    LockedSaving, SavingsRepositoryTrait, SavingsStatus, SavingsWithdrawal,
};
use gullak_core::Result;

use super::model::LockedSavingDB;
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::locked_savings;

/// Repository for locked savings rows.
///
/// Creation and withdrawal always run inside a ledger transaction together
/// with the wallet update and the transaction row.
pub struct SavingsRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl SavingsRepository {
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        SavingsRepository { pool }
    }
}

impl SavingsRepositoryTrait for SavingsRepository {
    fn find_by_id(&self, savings_id: &str) -> Result<Option<LockedSaving>> {
        let mut conn = get_connection(&self.pool)?;
        let saving_db = locked_savings::table
            .find(savings_id)
            .select(LockedSavingDB::as_select())
            .first::<LockedSavingDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(saving_db.map(LockedSaving::from))
    }

    fn find_by_id_in_transaction(
        &self,
        savings_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<Option<LockedSaving>> {
        let saving_db = locked_savings::table
            .find(savings_id)
            .select(LockedSavingDB::as_select())
            .first::<LockedSavingDB>(conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(saving_db.map(LockedSaving::from))
    }

    fn create_in_transaction(
        &self,
        saving: &LockedSaving,
        conn: &mut SqliteConnection,
    ) -> Result<LockedSaving> {
        let created = diesel::insert_into(locked_savings::table)
            .values(&LockedSavingDB::from(saving))
            .returning(LockedSavingDB::as_returning())
            .get_result::<LockedSavingDB>(conn)
            .map_err(StorageError::from)?;
        Ok(created.into())
    }

    fn apply_withdrawal_in_transaction(
        &self,
        withdrawal: &SavingsWithdrawal,
        conn: &mut SqliteConnection,
    ) -> Result<LockedSaving> {
        let updated = diesel::update(locked_savings::table.find(&withdrawal.savings_id))
            .set((
                locked_savings::status.eq(withdrawal.status.as_str()),
                locked_savings::withdrawn_at.eq(Some(withdrawal.withdrawn_at.naive_utc())),
                locked_savings::penalty_amount.eq(Some(withdrawal.penalty_amount)),
                locked_savings::final_amount.eq(Some(withdrawal.final_amount)),
            ))
            .returning(LockedSavingDB::as_returning())
            .get_result::<LockedSavingDB>(conn)
            .map_err(StorageError::from)?;
        Ok(updated.into())
    }

    fn list_by_user(
        &self,
        user_id: &str,
        status: Option<SavingsStatus>,
    ) -> Result<Vec<LockedSaving>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = locked_savings::table
            .filter(locked_savings::user_id.eq(user_id))
            .into_boxed();

        if let Some(status_filter) = status {
            query = query.filter(locked_savings::status.eq(status_filter.as_str()));
        }

        let rows = query
            .select(LockedSavingDB::as_select())
            .order(locked_savings::locked_at.desc())
            .load::<LockedSavingDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(LockedSaving::from).collect())
    }
}
