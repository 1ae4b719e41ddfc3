use diesel::sqlite::SqliteConnection;

use super::savings_model::{LockedSaving, SavingsStatus, SavingsWithdrawal};
use crate::Result;

/// Persistence contract for locked-savings records.
///
/// The `_in_transaction` methods run against a caller-supplied connection so
/// that savings writes commit atomically with the wallet and ledger writes of
/// the same operation.
pub trait SavingsRepositoryTrait: Send + Sync {
    fn find_by_id(&self, savings_id: &str) -> Result<Option<LockedSaving>>;

    fn find_by_id_in_transaction(
        &self,
        savings_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<Option<LockedSaving>>;

    fn create_in_transaction(
        &self,
        saving: &LockedSaving,
        conn: &mut SqliteConnection,
    ) -> Result<LockedSaving>;

    fn apply_withdrawal_in_transaction(
        &self,
        withdrawal: &SavingsWithdrawal,
        conn: &mut SqliteConnection,
    ) -> Result<LockedSaving>;

    fn list_by_user(
        &self,
        user_id: &str,
        status: Option<SavingsStatus>,
    ) -> Result<Vec<LockedSaving>>;
}
