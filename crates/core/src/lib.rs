//! Gullak Core - Domain entities, services, and traits.
//!
//! This crate contains the ledger-consistency core for Gullak: wallets,
//! locked savings, goals, and the append-only transaction ledger, together
//! with the service that moves money between them atomically. It is
//! database-agnostic apart from the transaction-executor contract in [`db`];
//! the store traits are implemented by the `storage-sqlite` crate.

pub mod clock;
pub mod constants;
pub mod db;
pub mod errors;
pub mod goals;
pub mod ledger;
pub mod products;
pub mod savings;
pub mod wallets;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
