//! SQLite storage implementation for the transaction ledger.

mod model;
mod repository;

pub use model::TransactionDB;
pub use repository::TransactionRepository;
