//! Database model for ledger transactions.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use gullak_core::ledger::{Transaction, TransactionType};

/// Database model for ledger transactions
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub transaction_type: String,
    pub amount: i64,
    pub penalty: Option<i64>,
    pub reference_id: Option<String>,
    pub description: String,
    pub created_at: NaiveDateTime,
}

fn parse_transaction_type(value: &str) -> TransactionType {
    value.parse().unwrap_or_else(|e| {
        log::error!("Unknown transaction type '{}': {}", value, e);
        TransactionType::Deposit
    })
}

// Conversion implementations

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            transaction_type: parse_transaction_type(&db.transaction_type),
            amount: db.amount,
            penalty: db.penalty,
            reference_id: db.reference_id,
            description: db.description,
            created_at: Utc.from_utc_datetime(&db.created_at),
        }
    }
}

impl From<&Transaction> for TransactionDB {
    fn from(domain: &Transaction) -> Self {
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            transaction_type: domain.transaction_type.as_str().to_string(),
            amount: domain.amount,
            penalty: domain.penalty,
            reference_id: domain.reference_id.clone(),
            description: domain.description.clone(),
            created_at: domain.created_at.naive_utc(),
        }
    }
}
