use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use gullak_core::goals::{Goal, GoalContribution, GoalRepositoryTrait, GoalTransition};
use gullak_core::Result;

use super::model::{GoalContributionDB, GoalDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{goal_contributions, goals};

/// Repository for goal and contribution rows.
///
/// Goal creation is a standalone write and goes through the write actor.
/// Contributions and status transitions always run inside a ledger
/// transaction.
pub struct GoalRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        GoalRepository { pool, writer }
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn find_by_id(&self, goal_id: &str) -> Result<Option<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let goal_db = goals::table
            .find(goal_id)
            .select(GoalDB::as_select())
            .first::<GoalDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(goal_db.map(Goal::from))
    }

    fn find_by_id_in_transaction(
        &self,
        goal_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<Option<Goal>> {
        let goal_db = goals::table
            .find(goal_id)
            .select(GoalDB::as_select())
            .first::<GoalDB>(conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(goal_db.map(Goal::from))
    }

    async fn create(&self, goal: &Goal) -> Result<Goal> {
        let goal_db = GoalDB::from(goal);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let created = diesel::insert_into(goals::table)
                    .values(&goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result::<GoalDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Goal::from(created))
            })
            .await
    }

    fn apply_transition_in_transaction(
        &self,
        transition: &GoalTransition,
        conn: &mut SqliteConnection,
    ) -> Result<Goal> {
        let updated = diesel::update(goals::table.find(&transition.goal_id))
            .set((
                goals::current_amount.eq(transition.current_amount),
                goals::status.eq(transition.status.as_str()),
                goals::completed_at.eq(transition.completed_at.map(|at| at.naive_utc())),
                goals::updated_at.eq(transition.updated_at.naive_utc()),
            ))
            .returning(GoalDB::as_returning())
            .get_result::<GoalDB>(conn)
            .map_err(StorageError::from)?;
        Ok(updated.into())
    }

    fn insert_contribution_in_transaction(
        &self,
        contribution: &GoalContribution,
        conn: &mut SqliteConnection,
    ) -> Result<GoalContribution> {
        let created = diesel::insert_into(goal_contributions::table)
            .values(&GoalContributionDB::from(contribution))
            .returning(GoalContributionDB::as_returning())
            .get_result::<GoalContributionDB>(conn)
            .map_err(StorageError::from)?;
        Ok(created.into())
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goals::table
            .filter(goals::user_id.eq(user_id))
            .select(GoalDB::as_select())
            .order(goals::created_at.desc())
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    fn list_contributions(&self, goal_id: &str) -> Result<Vec<GoalContribution>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goal_contributions::table
            .filter(goal_contributions::goal_id.eq(goal_id))
            .select(GoalContributionDB::as_select())
            .order(goal_contributions::contribution_date.desc())
            .load::<GoalContributionDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(GoalContribution::from).collect())
    }
}
