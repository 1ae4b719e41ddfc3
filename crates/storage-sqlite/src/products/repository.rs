use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use gullak_core::products::{Product, ProductCatalogTrait};
use gullak_core::Result;

use super::model::ProductDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::products;

/// Catalog backed by the local `products` table.
pub struct ProductRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl ProductRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        ProductRepository { pool, writer }
    }

    /// Inserts or refreshes catalog entries, returning the number of rows
    /// written.
    pub async fn upsert_products(&self, entries: Vec<Product>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut affected_rows = 0;
                for entry in entries {
                    let product_db: ProductDB = entry.into();
                    affected_rows += diesel::insert_into(products::table)
                        .values(&product_db)
                        .on_conflict(products::id)
                        .do_update()
                        .set(&product_db)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(affected_rows)
            })
            .await
    }
}

#[async_trait]
impl ProductCatalogTrait for ProductRepository {
    async fn get_product(&self, product_id: &str) -> Result<Option<Product>> {
        let mut conn = get_connection(&self.pool)?;
        let product_db = products::table
            .find(product_id)
            .select(ProductDB::as_select())
            .first::<ProductDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(product_db.map(Product::from))
    }
}
