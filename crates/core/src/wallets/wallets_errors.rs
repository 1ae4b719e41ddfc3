use thiserror::Error;

/// Wallet-level failures surfaced by the ledger operations.
#[derive(Error, Debug)]
pub enum WalletError {
    /// The wallet cannot cover the requested debit. Carries the numbers a
    /// client needs to render the shortfall.
    #[error("Insufficient wallet balance: available {available}, required {required}")]
    InsufficientBalance { available: i64, required: i64 },
}

impl WalletError {
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
        }
    }
}
