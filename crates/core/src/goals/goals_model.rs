//! Goal domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::goals_constants::*;
use crate::products::Product;
use crate::{errors::ValidationError, Error, Result};

/// Lifecycle status of a goal.
///
/// `completed` and `cancelled` are terminal; both are reachable only from
/// `active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => GOAL_STATUS_ACTIVE,
            GoalStatus::Completed => GOAL_STATUS_COMPLETED,
            GoalStatus::Cancelled => GOAL_STATUS_CANCELLED,
        }
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            s if s == GOAL_STATUS_ACTIVE => Ok(GoalStatus::Active),
            s if s == GOAL_STATUS_COMPLETED => Ok(GoalStatus::Completed),
            s if s == GOAL_STATUS_CANCELLED => Ok(GoalStatus::Cancelled),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

/// A savings target tied to a catalog product.
///
/// `product_name` and `product_image_url` are snapshots taken at creation so
/// catalog edits never rewrite goal history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_image_url: Option<String>,
    pub target_amount: i64,
    /// Monotonically non-decreasing while the goal is active.
    pub current_amount: i64,
    pub status: GoalStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Builds a new active goal from a validated payload and its catalog
    /// product.
    pub fn new(user_id: &str, payload: &NewGoal, product: &Product, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_image_url: product.image_url.clone(),
            target_amount: payload.target_amount,
            current_amount: 0,
            status: GoalStatus::Active,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_fully_funded(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Funding progress, capped to 0..=100.
    pub fn progress_percent(&self) -> i64 {
        if self.target_amount <= 0 {
            return 0;
        }
        (self.current_amount * 100 / self.target_amount).clamp(0, 100)
    }

    /// Amount still needed to reach the target, never negative.
    pub fn remaining_amount(&self) -> i64 {
        (self.target_amount - self.current_amount).max(0)
    }

    /// State change produced by contributing `amount`.
    ///
    /// The goal completes exactly when the new total reaches the target;
    /// overshoot completes too and is kept, not refunded.
    pub fn apply_contribution(&self, amount: i64, now: DateTime<Utc>) -> GoalTransition {
        let new_current = self.current_amount + amount;
        let completed = new_current >= self.target_amount;
        GoalTransition {
            goal_id: self.id.clone(),
            current_amount: new_current,
            status: if completed {
                GoalStatus::Completed
            } else {
                GoalStatus::Active
            },
            completed_at: if completed { Some(now) } else { None },
            updated_at: now,
        }
    }

    /// State change produced by a manual completion.
    pub fn complete(&self, now: DateTime<Utc>) -> GoalTransition {
        GoalTransition {
            goal_id: self.id.clone(),
            current_amount: self.current_amount,
            status: GoalStatus::Completed,
            completed_at: Some(now),
            updated_at: now,
        }
    }

    /// State change produced by a cancellation.
    pub fn cancel(&self, now: DateTime<Utc>) -> GoalTransition {
        GoalTransition {
            goal_id: self.id.clone(),
            current_amount: self.current_amount,
            status: GoalStatus::Cancelled,
            completed_at: None,
            updated_at: now,
        }
    }
}

/// The single mutation shape applied to a goal row, produced by the
/// transition methods above and written inside the operation's transaction.
#[derive(Debug, Clone)]
pub struct GoalTransition {
    pub goal_id: String,
    pub current_amount: i64,
    pub status: GoalStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// One successful contribution. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalContribution {
    pub id: String,
    pub goal_id: String,
    pub user_id: String,
    pub amount: i64,
    pub notes: Option<String>,
    pub contribution_date: DateTime<Utc>,
}

impl GoalContribution {
    pub fn new(
        user_id: &str,
        goal_id: &str,
        payload: &NewContribution,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            goal_id: goal_id.to_string(),
            user_id: user_id.to_string(),
            amount: payload.amount,
            notes: payload.notes.clone(),
            contribution_date: now,
        }
    }
}

/// Input model for creating a new goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub product_id: String,
    pub target_amount: i64,
}

impl NewGoal {
    /// Validates the goal payload.
    pub fn validate(&self) -> Result<()> {
        if self.product_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Product id is required".to_string(),
            )));
        }
        if self.target_amount <= 0 {
            return Err(Error::Validation(ValidationError::InvalidAmount(
                "Goal target must be positive".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for contributing to a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContribution {
    pub amount: i64,
    pub notes: Option<String>,
}

impl NewContribution {
    /// Validates the contribution payload.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= 0 {
            return Err(Error::Validation(ValidationError::InvalidAmount(
                "Contribution amount must be positive".to_string(),
            )));
        }
        Ok(())
    }
}

/// Result of a contribution operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionSummary {
    pub goal: Goal,
    pub contribution: GoalContribution,
    pub wallet_balance: i64,
    pub goal_completed: bool,
}

/// Result of a cancellation operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationSummary {
    pub goal: Goal,
    /// Accumulated amount returned to the wallet; zero for an unfunded goal.
    pub refunded: i64,
    pub wallet_balance: i64,
}

/// A goal with its full contribution history, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDetail {
    pub goal: Goal,
    pub contributions: Vec<GoalContribution>,
}
