//! Locked-savings module - domain models, state machine, and store traits.

mod savings_constants;
mod savings_errors;
mod savings_model;
mod savings_traits;


// Re-export the public interface
pub use savings_constants::*;
pub use savings_errors::SavingsError;
pub use savings_model::{
    early_withdrawal_penalty, LockedSaving, NewLockedSaving, SavingsHistory, SavingsStatus,
    SavingsSummary, SavingsWithdrawal, WithdrawalQuote, WithdrawalSummary,
};
pub use savings_traits::SavingsRepositoryTrait;
