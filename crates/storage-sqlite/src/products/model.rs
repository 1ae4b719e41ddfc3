//! Database model for catalog products.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use gullak_core::products::Product;

/// Database model for catalog products
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductDB {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    pub price: i64,
    pub available: bool,
}

// Conversion implementations

impl From<ProductDB> for Product {
    fn from(db: ProductDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            image_url: db.image_url,
            price: db.price,
            available: db.available,
        }
    }
}

impl From<Product> for ProductDB {
    fn from(domain: Product) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            image_url: domain.image_url,
            price: domain.price,
            available: domain.available,
        }
    }
}
