//! Products module - catalog collaborator consumed by goal creation.

mod products_errors;
mod products_model;
mod products_traits;

// Re-export the public interface
pub use products_errors::ProductError;
pub use products_model::Product;
pub use products_traits::ProductCatalogTrait;
