//! Ledger module - the append-only transaction log and the service
//! orchestrating every money movement.

mod ledger_constants;
mod ledger_model;
mod ledger_service;
mod ledger_traits;

#[cfg(test)]
mod ledger_service_tests;

// Re-export the public interface
pub use ledger_constants::*;
pub use ledger_model::{
    format_amount, DepositSummary, Transaction, TransactionFilter, TransactionType,
};
pub use ledger_service::LedgerService;
pub use ledger_traits::{LedgerServiceTrait, TransactionRepositoryTrait};
