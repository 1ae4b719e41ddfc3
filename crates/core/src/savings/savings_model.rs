//! Locked-savings domain models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::savings_constants::*;
use crate::constants::{EARLY_WITHDRAWAL_PENALTY_PERCENT, MAX_LOCK_DAYS, MIN_LOCK_DAYS};
use crate::{errors::ValidationError, Error, Result};

/// Penalty for withdrawing before the unlock date: a fixed percentage of the
/// locked amount, rounded half-up to the smallest currency unit.
pub fn early_withdrawal_penalty(amount: i64) -> i64 {
    (amount * EARLY_WITHDRAWAL_PENALTY_PERCENT + 50) / 100
}

/// Lifecycle status of a locked saving.
///
/// The transition out of `Active` happens exactly once, in the withdraw
/// operation, and is never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SavingsStatus {
    #[default]
    Active,
    Withdrawn,
    EarlyWithdrawal,
}

impl SavingsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SavingsStatus::Active => SAVINGS_STATUS_ACTIVE,
            SavingsStatus::Withdrawn => SAVINGS_STATUS_WITHDRAWN,
            SavingsStatus::EarlyWithdrawal => SAVINGS_STATUS_EARLY_WITHDRAWAL,
        }
    }
}

impl FromStr for SavingsStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            s if s == SAVINGS_STATUS_ACTIVE => Ok(SavingsStatus::Active),
            s if s == SAVINGS_STATUS_WITHDRAWN => Ok(SavingsStatus::Withdrawn),
            s if s == SAVINGS_STATUS_EARLY_WITHDRAWAL => Ok(SavingsStatus::EarlyWithdrawal),
            _ => Err(format!("Unknown savings status: {}", s)),
        }
    }
}

/// A time-committed deposit: the amount is locked from `locked_at` until
/// `unlock_at`, and withdrawing earlier costs the fixed penalty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockedSaving {
    pub id: String,
    pub user_id: String,
    /// Locked amount in the smallest currency unit. Immutable after creation.
    pub amount: i64,
    pub lock_days: i32,
    pub locked_at: DateTime<Utc>,
    pub unlock_at: DateTime<Utc>,
    pub status: SavingsStatus,
    pub withdrawn_at: Option<DateTime<Utc>>,
    /// Penalty charged on withdrawal; zero for an on-time withdrawal.
    pub penalty_amount: Option<i64>,
    /// Amount actually credited to the wallet on withdrawal.
    pub final_amount: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl LockedSaving {
    /// Builds a new active lock from a validated payload.
    pub fn new(user_id: &str, payload: &NewLockedSaving, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            amount: payload.amount,
            lock_days: payload.lock_days,
            locked_at: now,
            unlock_at: now + Duration::days(i64::from(payload.lock_days)),
            status: SavingsStatus::Active,
            withdrawn_at: None,
            penalty_amount: None,
            final_amount: None,
            created_at: now,
        }
    }

    /// Whether the lock period has elapsed.
    pub fn is_unlocked(&self, now: DateTime<Utc>) -> bool {
        now >= self.unlock_at
    }

    /// Whole days until the unlock date, rounded up, never negative.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        if self.is_unlocked(now) {
            return 0;
        }
        let seconds = (self.unlock_at - now).num_seconds();
        (seconds + 86_399) / 86_400
    }

    /// Computes the terms a withdrawal at `now` would settle on.
    ///
    /// Before the unlock date the penalty applies and the saving moves to
    /// `early_withdrawal`; on or after it the full amount is returned.
    pub fn withdrawal_quote(&self, now: DateTime<Utc>) -> WithdrawalQuote {
        if now < self.unlock_at {
            let penalty = early_withdrawal_penalty(self.amount);
            WithdrawalQuote {
                is_early: true,
                penalty,
                final_amount: self.amount - penalty,
                status: SavingsStatus::EarlyWithdrawal,
            }
        } else {
            WithdrawalQuote {
                is_early: false,
                penalty: 0,
                final_amount: self.amount,
                status: SavingsStatus::Withdrawn,
            }
        }
    }
}

/// Computed terms of a withdrawal, decided by the clock against the
/// unlock date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalQuote {
    pub is_early: bool,
    pub penalty: i64,
    pub final_amount: i64,
    pub status: SavingsStatus,
}

/// Input model for creating a new lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLockedSaving {
    pub amount: i64,
    pub lock_days: i32,
}

impl NewLockedSaving {
    /// Validates the lock payload.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= 0 {
            return Err(Error::Validation(ValidationError::InvalidAmount(
                "Lock amount must be positive".to_string(),
            )));
        }
        if self.lock_days < MIN_LOCK_DAYS || self.lock_days > MAX_LOCK_DAYS {
            return Err(Error::Validation(ValidationError::InvalidLockDays(format!(
                "Lock period must be between {} and {} days",
                MIN_LOCK_DAYS, MAX_LOCK_DAYS
            ))));
        }
        Ok(())
    }
}

/// The single mutation a locked saving ever receives, applied inside the
/// withdraw transaction.
#[derive(Debug, Clone)]
pub struct SavingsWithdrawal {
    pub savings_id: String,
    pub status: SavingsStatus,
    pub withdrawn_at: DateTime<Utc>,
    pub penalty_amount: i64,
    pub final_amount: i64,
}

/// Result of a withdraw operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalSummary {
    pub savings_id: String,
    pub original_amount: i64,
    pub withdrawn_amount: i64,
    pub penalty: i64,
    pub is_early_withdrawal: bool,
    pub status: SavingsStatus,
    pub wallet_balance: i64,
}

/// Aggregate figures over a user's savings records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    /// Sum of amounts still locked.
    pub total_locked: i64,
    /// Sum of amounts credited by past withdrawals.
    pub total_withdrawn: i64,
    /// Sum of penalties charged by past withdrawals.
    pub total_penalties: i64,
    pub active_count: usize,
}

impl SavingsSummary {
    /// Folds a set of savings records into their aggregate figures.
    pub fn from_records(records: &[LockedSaving]) -> Self {
        let mut summary = SavingsSummary {
            total_locked: 0,
            total_withdrawn: 0,
            total_penalties: 0,
            active_count: 0,
        };
        for record in records {
            match record.status {
                SavingsStatus::Active => {
                    summary.total_locked += record.amount;
                    summary.active_count += 1;
                }
                SavingsStatus::Withdrawn | SavingsStatus::EarlyWithdrawal => {
                    summary.total_withdrawn += record.final_amount.unwrap_or(0);
                    summary.total_penalties += record.penalty_amount.unwrap_or(0);
                }
            }
        }
        summary
    }
}

/// A user's full savings history with its aggregate summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsHistory {
    pub savings: Vec<LockedSaving>,
    pub summary: SavingsSummary,
}
