use thiserror::Error;

use super::savings_model::SavingsStatus;

/// Errors specific to locked-savings operations.
#[derive(Debug, Error)]
pub enum SavingsError {
    #[error("Savings record not found: {0}")]
    NotFound(String),

    #[error("Savings record belongs to another user")]
    NotOwned,

    #[error("Savings record is no longer active (status: {})", .status.as_str())]
    AlreadyWithdrawn { status: SavingsStatus },
}

impl SavingsError {
    /// Stable machine-readable code for API mapping.
    pub fn code(&self) -> &'static str {
        match self {
            SavingsError::NotFound(_) => "SAVINGS_NOT_FOUND",
            SavingsError::NotOwned => "FORBIDDEN",
            SavingsError::AlreadyWithdrawn { .. } => "ALREADY_WITHDRAWN",
        }
    }
}
