//! Database model for wallets.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use gullak_core::wallets::Wallet;

/// Database model for wallets
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
#[diesel(table_name = crate::schema::wallets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletDB {
    pub id: String,
    pub user_id: String,
    pub balance: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion implementations

impl From<WalletDB> for Wallet {
    fn from(db: WalletDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            balance: db.balance,
            created_at: Utc.from_utc_datetime(&db.created_at),
            updated_at: Utc.from_utc_datetime(&db.updated_at),
        }
    }
}

impl From<&Wallet> for WalletDB {
    fn from(domain: &Wallet) -> Self {
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            balance: domain.balance,
            created_at: domain.created_at.naive_utc(),
            updated_at: domain.updated_at.naive_utc(),
        }
    }
}
