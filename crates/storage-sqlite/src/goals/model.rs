//! Database models for goals.

use chrono::{NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use gullak_core::goals::{Goal, GoalContribution, GoalStatus};

/// Database model for goals
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
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_image_url: Option<String>,
    pub target_amount: i64,
    pub current_amount: i64,
    pub status: String,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for goal contributions
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Associations,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(belongs_to(GoalDB, foreign_key = goal_id))]
#[diesel(table_name = crate::schema::goal_contributions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalContributionDB {
    pub id: String,
    pub goal_id: String,
    pub user_id: String,
    pub amount: i64,
    pub notes: Option<String>,
    pub contribution_date: NaiveDateTime,
}

fn parse_status(value: &str) -> GoalStatus {
    value.parse().unwrap_or_else(|e| {
        log::error!("Unknown goal status '{}': {}", value, e);
        GoalStatus::default()
    })
}

// Conversion implementations

impl From<GoalDB> for Goal {
    fn from(db: GoalDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            product_id: db.product_id,
            product_name: db.product_name,
            product_image_url: db.product_image_url,
            target_amount: db.target_amount,
            current_amount: db.current_amount,
            status: parse_status(&db.status),
            completed_at: db.completed_at.map(|at| Utc.from_utc_datetime(&at)),
            created_at: Utc.from_utc_datetime(&db.created_at),
            updated_at: Utc.from_utc_datetime(&db.updated_at),
        }
    }
}

impl From<&Goal> for GoalDB {
    fn from(domain: &Goal) -> Self {
        Self {
            id: domain.id.clone(),
            user_id: domain.user_id.clone(),
            product_id: domain.product_id.clone(),
            product_name: domain.product_name.clone(),
            product_image_url: domain.product_image_url.clone(),
            target_amount: domain.target_amount,
            current_amount: domain.current_amount,
            status: domain.status.as_str().to_string(),
            completed_at: domain.completed_at.map(|at| at.naive_utc()),
            created_at: domain.created_at.naive_utc(),
            updated_at: domain.updated_at.naive_utc(),
        }
    }
}

impl From<GoalContributionDB> for GoalContribution {
    fn from(db: GoalContributionDB) -> Self {
        Self {
            id: db.id,
            goal_id: db.goal_id,
            user_id: db.user_id,
            amount: db.amount,
            notes: db.notes,
            contribution_date: Utc.from_utc_datetime(&db.contribution_date),
        }
    }
}

impl From<&GoalContribution> for GoalContributionDB {
    fn from(domain: &GoalContribution) -> Self {
        Self {
            id: domain.id.clone(),
            goal_id: domain.goal_id.clone(),
            user_id: domain.user_id.clone(),
            amount: domain.amount,
            notes: domain.notes.clone(),
            contribution_date: domain.contribution_date.naive_utc(),
        }
    }
}
