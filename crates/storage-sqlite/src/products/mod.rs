//! SQLite-backed product catalog.

mod model;
mod repository;

pub use model::ProductDB;
pub use repository::ProductRepository;
