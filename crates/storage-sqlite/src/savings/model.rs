//! Database model for locked savings.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use gullak_core::savings::{LockedSaving, SavingsStatus};

/// Database model for locked savings
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
#[diesel(table_name = crate::schema::locked_savings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LockedSavingDB {
    pub id: String,
    pub user_id: String,
    pub amount: i64,
    pub lock_days: i32,
    pub locked_at: NaiveDateTime,
    pub unlock_at: NaiveDateTime,
    pub status: String,
    pub withdrawn_at: Option<NaiveDateTime>,
    pub penalty_amount: Option<i64>,
    pub final_amount: Option<i64>,
    pub created_at: NaiveDateTime,
}

fn parse_status(value: &str) -> SavingsStatus {
    value.parse().unwrap_or_else(|e| {
        log::error!("Unknown savings status '{}': {}", value, e);
        SavingsStatus::default()
    })
}

// Conversion implementations

impl From<LockedSavingDB> for LockedSaving {
    fn from(db: LockedSavingDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            amount: db.amount,
            lock_days: db.lock_days,
            locked_at: Utc.from_utc_datetime(&db.locked_at),
            unlock_at: Utc.from_utc_datetime(&db.unlock_at),
            status: parse_status(&db.status),
            withdrawn_at: db.withdrawn_at.map(|at| Utc.from_utc_datetime(&at)),
            penalty_amount: db.penalty_amount,
            final_amount: db.final_amount,
            created_at: Utc.from_utc_datetime(&db.created_at),
        }
    }
}

impl From<&LockedSaving> for LockedSavingDB {
    fn from(domain: &LockedSaving) -> Self {
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            amount: domain.amount,
            lock_days: domain.lock_days,
            locked_at: domain.locked_at.naive_utc(),
            unlock_at: domain.unlock_at.naive_utc(),
            status: domain.status.as_str().to_string(),
            withdrawn_at: domain.withdrawn_at.map(|at| at.naive_utc()),
            penalty_amount: domain.penalty_amount,
            final_amount: domain.final_amount,
            created_at: domain.created_at.naive_utc(),
        }
    }
}
