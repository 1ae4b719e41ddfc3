//! Wallets module - domain models and store traits.

mod wallets_errors;
mod wallets_model;
mod wallets_traits;

#[cfg(test)]
mod wallets_model_tests;

// Re-export the public interface
pub use wallets_errors::WalletError;
pub use wallets_model::{NewDeposit, NewRewardCredit, Wallet};
pub use wallets_traits::WalletRepositoryTrait;
