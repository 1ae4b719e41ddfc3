//! Transaction ledger domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::ledger_constants::*;
use crate::constants::{DEFAULT_TRANSACTION_LIMIT, MAX_TRANSACTION_LIMIT, UNITS_PER_RUPEE};

/// Kind of money movement a ledger row records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    EarlyWithdrawal,
    Lock,
    GoalAllocation,
    GoalRefund,
    RewardClaim,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => TRANSACTION_TYPE_DEPOSIT,
            TransactionType::Withdrawal => TRANSACTION_TYPE_WITHDRAWAL,
            TransactionType::EarlyWithdrawal => TRANSACTION_TYPE_EARLY_WITHDRAWAL,
            TransactionType::Lock => TRANSACTION_TYPE_LOCK,
            TransactionType::GoalAllocation => TRANSACTION_TYPE_GOAL_ALLOCATION,
            TransactionType::GoalRefund => TRANSACTION_TYPE_GOAL_REFUND,
            TransactionType::RewardClaim => TRANSACTION_TYPE_REWARD_CLAIM,
        }
    }

    /// Whether rows of this type credit the wallet (positive amount).
    pub fn is_credit(&self) -> bool {
        matches!(
            self,
            TransactionType::Deposit
                | TransactionType::Withdrawal
                | TransactionType::EarlyWithdrawal
                | TransactionType::GoalRefund
                | TransactionType::RewardClaim
        )
    }

    /// Whether rows of this type debit the wallet (negative amount).
    pub fn is_debit(&self) -> bool {
        !self.is_credit()
    }

    /// Applies this type's sign to a positive magnitude.
    pub fn signed_amount(&self, magnitude: i64) -> i64 {
        if self.is_credit() {
            magnitude
        } else {
            -magnitude
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            s if s == TRANSACTION_TYPE_DEPOSIT => Ok(TransactionType::Deposit),
            s if s == TRANSACTION_TYPE_WITHDRAWAL => Ok(TransactionType::Withdrawal),
            s if s == TRANSACTION_TYPE_EARLY_WITHDRAWAL => Ok(TransactionType::EarlyWithdrawal),
            s if s == TRANSACTION_TYPE_LOCK => Ok(TransactionType::Lock),
            s if s == TRANSACTION_TYPE_GOAL_ALLOCATION => Ok(TransactionType::GoalAllocation),
            s if s == TRANSACTION_TYPE_GOAL_REFUND => Ok(TransactionType::GoalRefund),
            s if s == TRANSACTION_TYPE_REWARD_CLAIM => Ok(TransactionType::RewardClaim),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

/// One ledger row. Append-only, never updated or deleted.
///
/// `amount` is signed: credit types carry positive amounts, debit types
/// negative, so for every user the sum of amounts equals the wallet balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub transaction_type: TransactionType,
    pub amount: i64,
    /// Penalty charged, set on withdrawal rows (zero when on time).
    pub penalty: Option<i64>,
    /// Id of the saving, goal, contribution, or reward behind the movement.
    pub reference_id: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a ledger row from a positive magnitude; the sign is applied
    /// from the transaction type so callers cannot break the convention.
    pub fn new(
        user_id: &str,
        transaction_type: TransactionType,
        magnitude: i64,
        penalty: Option<i64>,
        reference_id: Option<String>,
        description: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            transaction_type,
            amount: transaction_type.signed_amount(magnitude),
            penalty,
            reference_id,
            description,
            created_at: now,
        }
    }
}

/// Filter for listing a user's ledger rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilter {
    pub transaction_type: Option<TransactionType>,
    pub limit: Option<i64>,
}

impl TransactionFilter {
    /// Row limit to apply: defaults to 50, capped at 100.
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_TRANSACTION_LIMIT)
            .clamp(1, MAX_TRANSACTION_LIMIT)
    }
}

/// Result of a deposit or reward claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositSummary {
    pub balance: i64,
    pub transaction: Transaction,
}

/// Formats an amount in the smallest unit as rupees for ledger descriptions.
pub fn format_amount(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.abs();
    let rupees = abs / UNITS_PER_RUPEE;
    let fraction = abs % UNITS_PER_RUPEE;
    if fraction == 0 {
        format!("{}₹{}", sign, rupees)
    } else {
        format!("{}₹{}.{:02}", sign, rupees, fraction)
    }
}
