use async_trait::async_trait;

use super::products_model::Product;
use crate::Result;

/// Read-only catalog lookup, consulted only when a goal is created.
///
/// The SQLite crate ships a table-backed implementation; an embedding
/// application may substitute a remote catalog behind the same trait.
#[async_trait]
pub trait ProductCatalogTrait: Send + Sync {
    async fn get_product(&self, product_id: &str) -> Result<Option<Product>>;
}
