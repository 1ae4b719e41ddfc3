//! SQLite storage implementation for locked savings.

mod model;
mod repository;

pub use model::LockedSavingDB;
pub use repository::SavingsRepository;
