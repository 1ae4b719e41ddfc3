//! Core error types for the Gullak application.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage
//! layer. Every variant that a caller can act on maps to a stable
//! machine-readable code via [`Error::code`].

use thiserror::Error;

use crate::goals::GoalError;
use crate::products::ProductError;
use crate::savings::SavingsError;
use crate::wallets::WalletError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the savings application.
///
/// Validation, not-found, ownership, state-conflict, and balance errors are
/// expected outcomes of the ledger operations and carry enough context for a
/// client to render them. Database errors are internal failures that abort
/// the enclosing transaction.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),

    #[error("Savings error: {0}")]
    Savings(#[from] SavingsError),

    #[error("Goal error: {0}")]
    Goal(#[from] GoalError),

    #[error("Product error: {0}")]
    Product(#[from] ProductError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Stable machine-readable code for this error.
    ///
    /// Clients key on these codes; the display message is free to change,
    /// the codes are not.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Database(_) => "INTERNAL_ERROR",
            Error::Validation(e) => e.code(),
            Error::Wallet(e) => e.code(),
            Error::Savings(e) => e.code(),
            Error::Goal(e) => e.code(),
            Error::Product(e) => e.code(),
            Error::Unexpected(_) => "INTERNAL_ERROR",
        }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input.
///
/// Always caller-fixable; returned before any transaction is opened.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid lock period: {0}")]
    InvalidLockDays(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidAmount(_) => "INVALID_AMOUNT",
            ValidationError::InvalidLockDays(_) => "INVALID_LOCK_DAYS",
            ValidationError::InvalidInput(_) => "VALIDATION_ERROR",
        }
    }
}

// === From implementations for common error types ===

impl From<r2d2::Error> for Error {
    fn from(err: r2d2::Error) -> Self {
        Error::Database(DatabaseError::ConnectionFailed(err.to_string()))
    }
}
