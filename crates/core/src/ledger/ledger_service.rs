use log::debug;
use std::sync::Arc;

use super::ledger_model::{
    format_amount, DepositSummary, Transaction, TransactionFilter, TransactionType,
};
use super::ledger_traits::{LedgerServiceTrait, TransactionRepositoryTrait};
use crate::clock::Clock;
use crate::db::DbTransactionExecutor;
use crate::errors::Result;
use crate::goals::{
    CancellationSummary, ContributionSummary, Goal, GoalContribution, GoalDetail, GoalError,
    GoalRepositoryTrait, GoalStatus, NewContribution, NewGoal,
};
use crate::products::{ProductCatalogTrait, ProductError};
use crate::savings::{
    LockedSaving, NewLockedSaving, SavingsError, SavingsHistory, SavingsRepositoryTrait,
    SavingsStatus, SavingsSummary, SavingsWithdrawal, WithdrawalSummary,
};
use crate::wallets::{NewDeposit, NewRewardCredit, Wallet, WalletError, WalletRepositoryTrait};
use crate::Error;

/// Orchestrates every money movement across the wallet, savings, goal, and
/// ledger stores (Generic over Executor).
///
/// Each mutating operation re-checks its preconditions inside the atomic
/// transaction, so two racing writers cannot both pass a stale check.
pub struct LedgerService<E: DbTransactionExecutor + Send + Sync + Clone> {
    wallet_repository: Arc<dyn WalletRepositoryTrait>,
    savings_repository: Arc<dyn SavingsRepositoryTrait>,
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    product_catalog: Arc<dyn ProductCatalogTrait>,
    clock: Arc<dyn Clock>,
    transaction_executor: E,
}

impl<E: DbTransactionExecutor + Send + Sync + Clone> LedgerService<E> {
    /// Creates a new LedgerService instance
    pub fn new(
        wallet_repository: Arc<dyn WalletRepositoryTrait>,
        savings_repository: Arc<dyn SavingsRepositoryTrait>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        product_catalog: Arc<dyn ProductCatalogTrait>,
        clock: Arc<dyn Clock>,
        transaction_executor: E,
    ) -> Self {
        Self {
            wallet_repository,
            savings_repository,
            goal_repository,
            transaction_repository,
            product_catalog,
            clock,
            transaction_executor,
        }
    }
}

#[async_trait::async_trait]
impl<E: DbTransactionExecutor + Send + Sync + Clone> LedgerServiceTrait for LedgerService<E> {
    /// Locks wallet money for a committed period: debits the wallet, creates
    /// the savings record, and appends the ledger row in one transaction.
    async fn lock_savings(&self, user_id: &str, payload: NewLockedSaving) -> Result<LockedSaving> {
        debug!(
            "Locking savings for user {}: amount={}, lock_days={}",
            user_id, payload.amount, payload.lock_days
        );
        payload.validate()?;

        let now = self.clock.now();
        let saving = LockedSaving::new(user_id, &payload, now);

        // Clones for the transaction closure
        let wallet_repository_for_tx = self.wallet_repository.clone();
        let savings_repository_for_tx = self.savings_repository.clone();
        let transaction_repository_for_tx = self.transaction_repository.clone();
        let user_id_for_tx = user_id.to_string();

        self.transaction_executor.execute(move |tx_conn| {
            let wallet = wallet_repository_for_tx.get_or_create_in_transaction(
                &user_id_for_tx,
                now,
                tx_conn,
            )?;
            if !wallet.can_cover(saving.amount) {
                return Err(Error::Wallet(WalletError::InsufficientBalance {
                    available: wallet.balance,
                    required: saving.amount,
                }));
            }

            let created = savings_repository_for_tx.create_in_transaction(&saving, tx_conn)?;
            wallet_repository_for_tx.adjust_balance_in_transaction(
                &user_id_for_tx,
                -created.amount,
                now,
                tx_conn,
            )?;

            let entry = Transaction::new(
                &user_id_for_tx,
                TransactionType::Lock,
                created.amount,
                None,
                Some(created.id.clone()),
                format!(
                    "Locked {} for {} days",
                    format_amount(created.amount),
                    created.lock_days
                ),
                now,
            );
            transaction_repository_for_tx.append_in_transaction(&entry, tx_conn)?;

            Ok(created)
        })
    }

    /// Releases a locked saving back to the wallet. The status flip, the
    /// wallet credit, and the ledger row commit or roll back together.
    async fn withdraw_savings(
        &self,
        user_id: &str,
        savings_id: &str,
    ) -> Result<WithdrawalSummary> {
        debug!("Withdrawing savings {} for user {}", savings_id, user_id);
        let now = self.clock.now();

        // Clones for the transaction closure
        let wallet_repository_for_tx = self.wallet_repository.clone();
        let savings_repository_for_tx = self.savings_repository.clone();
        let transaction_repository_for_tx = self.transaction_repository.clone();
        let user_id_for_tx = user_id.to_string();
        let savings_id_for_tx = savings_id.to_string();

        self.transaction_executor.execute(move |tx_conn| {
            // Preconditions are checked on the row as read inside this
            // transaction, so a concurrent withdrawal cannot slip through.
            let saving = savings_repository_for_tx
                .find_by_id_in_transaction(&savings_id_for_tx, tx_conn)?
                .ok_or_else(|| Error::Savings(SavingsError::NotFound(savings_id_for_tx.clone())))?;

            if saving.user_id != user_id_for_tx {
                return Err(Error::Savings(SavingsError::NotOwned));
            }
            if saving.status != SavingsStatus::Active {
                return Err(Error::Savings(SavingsError::AlreadyWithdrawn {
                    status: saving.status,
                }));
            }

            let quote = saving.withdrawal_quote(now);
            let withdrawal = SavingsWithdrawal {
                savings_id: saving.id.clone(),
                status: quote.status,
                withdrawn_at: now,
                penalty_amount: quote.penalty,
                final_amount: quote.final_amount,
            };
            let updated =
                savings_repository_for_tx.apply_withdrawal_in_transaction(&withdrawal, tx_conn)?;

            wallet_repository_for_tx.get_or_create_in_transaction(&user_id_for_tx, now, tx_conn)?;
            let wallet = wallet_repository_for_tx.adjust_balance_in_transaction(
                &user_id_for_tx,
                quote.final_amount,
                now,
                tx_conn,
            )?;

            let (transaction_type, description) = if quote.is_early {
                (
                    TransactionType::EarlyWithdrawal,
                    format!(
                        "Withdrew {} early ({} penalty)",
                        format_amount(saving.amount),
                        format_amount(quote.penalty)
                    ),
                )
            } else {
                (
                    TransactionType::Withdrawal,
                    format!(
                        "Withdrew {} after {} day lock",
                        format_amount(saving.amount),
                        saving.lock_days
                    ),
                )
            };
            let entry = Transaction::new(
                &user_id_for_tx,
                transaction_type,
                quote.final_amount,
                Some(quote.penalty),
                Some(saving.id.clone()),
                description,
                now,
            );
            transaction_repository_for_tx.append_in_transaction(&entry, tx_conn)?;

            Ok(WithdrawalSummary {
                savings_id: updated.id,
                original_amount: saving.amount,
                withdrawn_amount: quote.final_amount,
                penalty: quote.penalty,
                is_early_withdrawal: quote.is_early,
                status: quote.status,
                wallet_balance: wallet.balance,
            })
        })
    }

    /// Adds money to the wallet and appends the matching ledger row.
    async fn deposit(&self, user_id: &str, payload: NewDeposit) -> Result<DepositSummary> {
        debug!("Depositing for user {}: amount={}", user_id, payload.amount);
        payload.validate()?;

        let now = self.clock.now();

        // Clones for the transaction closure
        let wallet_repository_for_tx = self.wallet_repository.clone();
        let transaction_repository_for_tx = self.transaction_repository.clone();
        let user_id_for_tx = user_id.to_string();

        self.transaction_executor.execute(move |tx_conn| {
            wallet_repository_for_tx.get_or_create_in_transaction(&user_id_for_tx, now, tx_conn)?;
            let wallet = wallet_repository_for_tx.adjust_balance_in_transaction(
                &user_id_for_tx,
                payload.amount,
                now,
                tx_conn,
            )?;

            let description = payload
                .description
                .clone()
                .unwrap_or_else(|| format!("Added {} to wallet", format_amount(payload.amount)));
            let entry = Transaction::new(
                &user_id_for_tx,
                TransactionType::Deposit,
                payload.amount,
                None,
                None,
                description,
                now,
            );
            let recorded = transaction_repository_for_tx.append_in_transaction(&entry, tx_conn)?;

            Ok::<_, Error>(DepositSummary {
                balance: wallet.balance,
                transaction: recorded,
            })
        })
    }

    /// Credits a reward to the wallet, keyed to its campaign or referral via
    /// `reference_id`.
    async fn claim_reward(
        &self,
        user_id: &str,
        payload: NewRewardCredit,
    ) -> Result<DepositSummary> {
        debug!(
            "Claiming reward for user {}: amount={}",
            user_id, payload.amount
        );
        payload.validate()?;

        let now = self.clock.now();

        // Clones for the transaction closure
        let wallet_repository_for_tx = self.wallet_repository.clone();
        let transaction_repository_for_tx = self.transaction_repository.clone();
        let user_id_for_tx = user_id.to_string();

        self.transaction_executor.execute(move |tx_conn| {
            wallet_repository_for_tx.get_or_create_in_transaction(&user_id_for_tx, now, tx_conn)?;
            let wallet = wallet_repository_for_tx.adjust_balance_in_transaction(
                &user_id_for_tx,
                payload.amount,
                now,
                tx_conn,
            )?;

            let description = payload
                .description
                .clone()
                .unwrap_or_else(|| format!("Claimed reward of {}", format_amount(payload.amount)));
            let entry = Transaction::new(
                &user_id_for_tx,
                TransactionType::RewardClaim,
                payload.amount,
                None,
                payload.reference_id.clone(),
                description,
                now,
            );
            let recorded = transaction_repository_for_tx.append_in_transaction(&entry, tx_conn)?;

            Ok::<_, Error>(DepositSummary {
                balance: wallet.balance,
                transaction: recorded,
            })
        })
    }

    /// Creates a goal after checking the catalog. No wallet interaction and
    /// no ledger row; creating a goal moves no money.
    async fn create_goal(&self, user_id: &str, payload: NewGoal) -> Result<Goal> {
        debug!(
            "Creating goal for user {}: product={}, target={}",
            user_id, payload.product_id, payload.target_amount
        );
        payload.validate()?;

        let product = self
            .product_catalog
            .get_product(&payload.product_id)
            .await?
            .ok_or_else(|| Error::Product(ProductError::NotFound(payload.product_id.clone())))?;
        if !product.available {
            return Err(Error::Product(ProductError::NotAvailable(product.id)));
        }

        let now = self.clock.now();
        let goal = Goal::new(user_id, &payload, &product, now);
        self.goal_repository.create(&goal).await
    }

    /// Moves wallet money into a goal. The wallet debit, the goal update,
    /// the contribution row, and the ledger row commit or roll back together.
    async fn contribute_to_goal(
        &self,
        user_id: &str,
        goal_id: &str,
        payload: NewContribution,
    ) -> Result<ContributionSummary> {
        debug!(
            "Contributing to goal {} for user {}: amount={}",
            goal_id, user_id, payload.amount
        );
        payload.validate()?;

        let now = self.clock.now();

        // Clones for the transaction closure
        let wallet_repository_for_tx = self.wallet_repository.clone();
        let goal_repository_for_tx = self.goal_repository.clone();
        let transaction_repository_for_tx = self.transaction_repository.clone();
        let user_id_for_tx = user_id.to_string();
        let goal_id_for_tx = goal_id.to_string();

        self.transaction_executor.execute(move |tx_conn| {
            let goal = goal_repository_for_tx
                .find_by_id_in_transaction(&goal_id_for_tx, tx_conn)?
                .ok_or_else(|| Error::Goal(GoalError::NotFound(goal_id_for_tx.clone())))?;

            if goal.user_id != user_id_for_tx {
                return Err(Error::Goal(GoalError::NotOwned));
            }
            if goal.status != GoalStatus::Active {
                return Err(Error::Goal(GoalError::NotActive {
                    status: goal.status,
                }));
            }

            let wallet = wallet_repository_for_tx.get_or_create_in_transaction(
                &user_id_for_tx,
                now,
                tx_conn,
            )?;
            if !wallet.can_cover(payload.amount) {
                return Err(Error::Wallet(WalletError::InsufficientBalance {
                    available: wallet.balance,
                    required: payload.amount,
                }));
            }

            let wallet = wallet_repository_for_tx.adjust_balance_in_transaction(
                &user_id_for_tx,
                -payload.amount,
                now,
                tx_conn,
            )?;

            // current_amount as read inside this transaction decides
            // completion
            let transition = goal.apply_contribution(payload.amount, now);
            let goal_completed = transition.status == GoalStatus::Completed;
            let updated_goal =
                goal_repository_for_tx.apply_transition_in_transaction(&transition, tx_conn)?;

            let contribution =
                GoalContribution::new(&user_id_for_tx, &goal_id_for_tx, &payload, now);
            let recorded = goal_repository_for_tx
                .insert_contribution_in_transaction(&contribution, tx_conn)?;

            let entry = Transaction::new(
                &user_id_for_tx,
                TransactionType::GoalAllocation,
                payload.amount,
                None,
                Some(recorded.id.clone()),
                format!(
                    "Saved {} toward {}",
                    format_amount(payload.amount),
                    goal.product_name
                ),
                now,
            );
            transaction_repository_for_tx.append_in_transaction(&entry, tx_conn)?;

            Ok(ContributionSummary {
                goal: updated_goal,
                contribution: recorded,
                wallet_balance: wallet.balance,
                goal_completed,
            })
        })
    }

    /// Marks a fully funded goal completed. Funds were moved by the prior
    /// contributions, so no wallet interaction and no ledger row.
    async fn complete_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        debug!("Completing goal {} for user {}", goal_id, user_id);
        let now = self.clock.now();

        // Clones for the transaction closure
        let goal_repository_for_tx = self.goal_repository.clone();
        let user_id_for_tx = user_id.to_string();
        let goal_id_for_tx = goal_id.to_string();

        self.transaction_executor.execute(move |tx_conn| {
            let goal = goal_repository_for_tx
                .find_by_id_in_transaction(&goal_id_for_tx, tx_conn)?
                .ok_or_else(|| Error::Goal(GoalError::NotFound(goal_id_for_tx.clone())))?;

            if goal.user_id != user_id_for_tx {
                return Err(Error::Goal(GoalError::NotOwned));
            }
            if goal.status != GoalStatus::Active {
                return Err(Error::Goal(GoalError::NotActive {
                    status: goal.status,
                }));
            }
            if !goal.is_fully_funded() {
                return Err(Error::Goal(GoalError::NotFullyFunded {
                    current_amount: goal.current_amount,
                    target_amount: goal.target_amount,
                    remaining: goal.remaining_amount(),
                }));
            }

            goal_repository_for_tx.apply_transition_in_transaction(&goal.complete(now), tx_conn)
        })
    }

    /// Cancels an active goal; accumulated funds go back to the wallet with
    /// a refund ledger row. An unfunded goal cancels without either.
    async fn cancel_goal(&self, user_id: &str, goal_id: &str) -> Result<CancellationSummary> {
        debug!("Cancelling goal {} for user {}", goal_id, user_id);
        let now = self.clock.now();

        // Clones for the transaction closure
        let wallet_repository_for_tx = self.wallet_repository.clone();
        let goal_repository_for_tx = self.goal_repository.clone();
        let transaction_repository_for_tx = self.transaction_repository.clone();
        let user_id_for_tx = user_id.to_string();
        let goal_id_for_tx = goal_id.to_string();

        self.transaction_executor.execute(move |tx_conn| {
            let goal = goal_repository_for_tx
                .find_by_id_in_transaction(&goal_id_for_tx, tx_conn)?
                .ok_or_else(|| Error::Goal(GoalError::NotFound(goal_id_for_tx.clone())))?;

            if goal.user_id != user_id_for_tx {
                return Err(Error::Goal(GoalError::NotOwned));
            }
            if goal.status != GoalStatus::Active {
                return Err(Error::Goal(GoalError::NotActive {
                    status: goal.status,
                }));
            }

            let refunded = goal.current_amount;
            let updated_goal =
                goal_repository_for_tx.apply_transition_in_transaction(&goal.cancel(now), tx_conn)?;

            let wallet = wallet_repository_for_tx.get_or_create_in_transaction(
                &user_id_for_tx,
                now,
                tx_conn,
            )?;
            let wallet = if refunded > 0 {
                let wallet = wallet_repository_for_tx.adjust_balance_in_transaction(
                    &user_id_for_tx,
                    refunded,
                    now,
                    tx_conn,
                )?;
                let entry = Transaction::new(
                    &user_id_for_tx,
                    TransactionType::GoalRefund,
                    refunded,
                    None,
                    Some(goal.id.clone()),
                    format!(
                        "Refund of {} from cancelled goal {}",
                        format_amount(refunded),
                        goal.product_name
                    ),
                    now,
                );
                transaction_repository_for_tx.append_in_transaction(&entry, tx_conn)?;
                wallet
            } else {
                wallet
            };

            Ok(CancellationSummary {
                goal: updated_goal,
                refunded,
                wallet_balance: wallet.balance,
            })
        })
    }

    /// Returns the user's wallet, creating it with a zero balance on first
    /// access.
    fn get_wallet(&self, user_id: &str) -> Result<Wallet> {
        if let Some(wallet) = self.wallet_repository.find_by_user_id(user_id)? {
            return Ok(wallet);
        }

        let now = self.clock.now();
        let wallet_repository_for_tx = self.wallet_repository.clone();
        let user_id_for_tx = user_id.to_string();

        // get_or_create re-checks inside the transaction, so a racing first
        // access yields one row
        self.transaction_executor.execute(move |tx_conn| {
            wallet_repository_for_tx.get_or_create_in_transaction(&user_id_for_tx, now, tx_conn)
        })
    }

    /// Lists the user's ledger rows, newest first.
    fn list_transactions(
        &self,
        user_id: &str,
        filter: TransactionFilter,
    ) -> Result<Vec<Transaction>> {
        (*self.transaction_repository).list_by_user(user_id, &filter)
    }

    /// Lists the user's active locks, newest first.
    fn list_active_savings(&self, user_id: &str) -> Result<Vec<LockedSaving>> {
        (*self.savings_repository).list_by_user(user_id, Some(SavingsStatus::Active))
    }

    /// Returns all of the user's savings records with aggregate figures.
    fn savings_history(&self, user_id: &str) -> Result<SavingsHistory> {
        let savings = (*self.savings_repository).list_by_user(user_id, None)?;
        let summary = SavingsSummary::from_records(&savings);
        Ok(SavingsHistory { savings, summary })
    }

    /// Lists the user's goals, newest first.
    fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        (*self.goal_repository).list_by_user(user_id)
    }

    /// Returns one goal with its contribution history. Owner-checked.
    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<GoalDetail> {
        let goal = self
            .goal_repository
            .find_by_id(goal_id)?
            .ok_or_else(|| Error::Goal(GoalError::NotFound(goal_id.to_string())))?;
        if goal.user_id != user_id {
            return Err(Error::Goal(GoalError::NotOwned));
        }

        let contributions = (*self.goal_repository).list_contributions(goal_id)?;
        Ok(GoalDetail {
            goal,
            contributions,
        })
    }
}
