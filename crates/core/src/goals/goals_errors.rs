use thiserror::Error;

use super::goals_model::GoalStatus;

/// Errors specific to goal operations.
#[derive(Debug, Error)]
pub enum GoalError {
    #[error("Goal not found: {0}")]
    NotFound(String),

    #[error("Goal belongs to another user")]
    NotOwned,

    #[error("Goal is no longer active (status: {})", .status.as_str())]
    NotActive { status: GoalStatus },

    #[error("Goal is not fully funded: {current_amount} of {target_amount} saved, {remaining} remaining")]
    NotFullyFunded {
        current_amount: i64,
        target_amount: i64,
        remaining: i64,
    },
}

impl GoalError {
    /// Stable machine-readable code for API mapping.
    pub fn code(&self) -> &'static str {
        match self {
            GoalError::NotFound(_) => "GOAL_NOT_FOUND",
            GoalError::NotOwned => "FORBIDDEN",
            GoalError::NotActive { .. } => "GOAL_NOT_ACTIVE",
            GoalError::NotFullyFunded { .. } => "GOAL_NOT_FULLY_FUNDED",
        }
    }
}
