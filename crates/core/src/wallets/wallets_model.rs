//! Wallet domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::ValidationError, Error, Result};

/// A user's spendable balance, in the smallest currency unit (paise).
///
/// One wallet per user, created lazily with a zero balance on first access.
/// The balance is mutated only inside ledger transactions, always together
/// with the transaction row that records the movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: String,
    pub user_id: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Builds a fresh zero-balance wallet for a user.
    pub fn new(user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            balance: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the balance covers the given amount.
    pub fn can_cover(&self, amount: i64) -> bool {
        self.balance >= amount
    }
}

/// Input model for a wallet deposit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeposit {
    pub amount: i64,
    pub description: Option<String>,
}

impl NewDeposit {
    /// Validates the deposit payload.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= 0 {
            return Err(Error::Validation(ValidationError::InvalidAmount(
                "Deposit amount must be positive".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for crediting a claimed reward to the wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRewardCredit {
    pub amount: i64,
    /// Identifier of the claimed reward, kept on the ledger row.
    pub reference_id: Option<String>,
    pub description: Option<String>,
}

impl NewRewardCredit {
    /// Validates the reward credit payload.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= 0 {
            return Err(Error::Validation(ValidationError::InvalidAmount(
                "Reward amount must be positive".to_string(),
            )));
        }
        Ok(())
    }
}
