//! SQLite storage implementation for Gullak.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `gullak-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for all domain entities
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel queries exist.
//! `core` stays database-agnostic and works with traits; the one exception is
//! the transaction contract, which hands repositories a raw connection so a
//! whole ledger operation commits or rolls back as one unit.
//!
//! ```text
//!          core (domain + services)
//!                   │
//!                   ▼
//!          storage-sqlite (this crate)
//!                   │
//!                   ▼
//!               SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod goals;
pub mod ledger;
pub mod products;
pub mod savings;
pub mod wallets;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, DbTransactionExecutor, WriteHandle,
};

// Re-export storage errors
pub use errors::StorageError;

// Re-export from gullak-core for convenience
pub use gullak_core::errors::{DatabaseError, Error, Result};
