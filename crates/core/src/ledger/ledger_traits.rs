//! Ledger repository and service traits.
//!
//! These traits define the contract for the transaction log and for the
//! money-movement operations without any database-specific types, allowing
//! for different storage implementations.

use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;

use super::ledger_model::{DepositSummary, Transaction, TransactionFilter};
use crate::errors::Result;
use crate::goals::{
    CancellationSummary, ContributionSummary, Goal, GoalDetail, NewContribution, NewGoal,
};
use crate::savings::{LockedSaving, NewLockedSaving, SavingsHistory, WithdrawalSummary};
use crate::wallets::{NewDeposit, NewRewardCredit, Wallet};

/// Persistence contract for the transaction ledger.
///
/// Rows are append-only; there is deliberately no update or delete method.
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Appends one row inside the caller's transaction.
    fn append_in_transaction(
        &self,
        transaction: &Transaction,
        conn: &mut SqliteConnection,
    ) -> Result<Transaction>;

    /// Lists a user's rows, newest first, per the filter.
    fn list_by_user(&self, user_id: &str, filter: &TransactionFilter) -> Result<Vec<Transaction>>;

    /// Sum of a user's signed amounts; equals the wallet balance when the
    /// ledger is consistent.
    fn sum_for_user(&self, user_id: &str) -> Result<i64>;
}

/// Contract for every money-movement operation.
///
/// `user_id` is always a separate parameter resolved by the embedding
/// application's identity layer, never part of a payload. Each mutating
/// operation runs as one atomic transaction; a failure leaves no partial
/// effects.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    /// Locks wallet money for a committed period.
    async fn lock_savings(&self, user_id: &str, payload: NewLockedSaving) -> Result<LockedSaving>;

    /// Releases a locked saving back to the wallet, with a penalty when
    /// before the unlock date.
    async fn withdraw_savings(&self, user_id: &str, savings_id: &str)
        -> Result<WithdrawalSummary>;

    /// Adds money to the wallet.
    async fn deposit(&self, user_id: &str, payload: NewDeposit) -> Result<DepositSummary>;

    /// Credits a promotional or reward amount to the wallet.
    async fn claim_reward(&self, user_id: &str, payload: NewRewardCredit)
        -> Result<DepositSummary>;

    /// Creates a goal targeting a catalog product. Moves no money.
    async fn create_goal(&self, user_id: &str, payload: NewGoal) -> Result<Goal>;

    /// Moves wallet money into a goal, completing it when the target is
    /// reached.
    async fn contribute_to_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        payload: NewContribution,
    ) -> Result<ContributionSummary>;

    /// Marks a fully funded goal completed. Moves no money.
    async fn complete_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal>;

    /// Cancels an active goal and refunds its accumulated funds.
    async fn cancel_goal(&self, user_id: &str, goal_id: &str) -> Result<CancellationSummary>;

    /// Returns the user's wallet, creating it with a zero balance on first
    /// access.
    fn get_wallet(&self, user_id: &str) -> Result<Wallet>;

    /// Lists the user's ledger rows, newest first.
    fn list_transactions(
        &self,
        user_id: &str,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>>;

    /// Lists the user's active locks, newest first.
    fn list_active_savings(&self, user_id: &str) -> Result<Vec<LockedSaving>>;

    /// Returns all of the user's savings records with aggregate figures.
    fn savings_history(&self, user_id: &str) -> Result<SavingsHistory>;

    /// Lists the user's goals, newest first.
    fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>>;

    /// Returns one goal with its contribution history. Owner-checked.
    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<GoalDetail>;
}
