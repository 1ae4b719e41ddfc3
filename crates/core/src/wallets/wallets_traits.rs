//! Wallet store contract.

use chrono::{DateTime, Utc};
use diesel::sqlite::SqliteConnection;

use super::wallets_model::Wallet;
use crate::errors::Result;

/// Repository contract for wallet persistence.
///
/// Balance mutations only exist as in-transaction methods: a wallet is never
/// touched outside the atomic operation that also writes its ledger row.
pub trait WalletRepositoryTrait: Send + Sync {
    /// Returns the wallet for a user when one exists.
    fn find_by_user_id(&self, user_id: &str) -> Result<Option<Wallet>>;

    /// Fetches the user's wallet inside a transaction, creating it with a
    /// zero balance on first access.
    fn get_or_create_in_transaction(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
        conn: &mut SqliteConnection,
    ) -> Result<Wallet>;

    /// Applies a signed delta to the balance inside a transaction and
    /// returns the updated wallet. The wallet row must already exist.
    fn adjust_balance_in_transaction(
        &self,
        user_id: &str,
        delta: i64,
        now: DateTime<Utc>,
        conn: &mut SqliteConnection,
    ) -> Result<Wallet>;
}
