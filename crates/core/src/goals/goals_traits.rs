use async_trait::async_trait;
use diesel::sqlite::SqliteConnection;

use super::goals_model::{Goal, GoalContribution, GoalTransition};
use crate::Result;

/// Persistence contract for goals and their contributions.
///
/// `create` is a standalone single-row write and goes through the serialized
/// writer; the `_in_transaction` methods compose inside the money-movement
/// transactions of contribute and cancel.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn find_by_id(&self, goal_id: &str) -> Result<Option<Goal>>;

    fn find_by_id_in_transaction(
        &self,
        goal_id: &str,
        conn: &mut SqliteConnection,
    ) -> Result<Option<Goal>>;

    async fn create(&self, goal: &Goal) -> Result<Goal>;

    fn apply_transition_in_transaction(
        &self,
        transition: &GoalTransition,
        conn: &mut SqliteConnection,
    ) -> Result<Goal>;

    fn insert_contribution_in_transaction(
        &self,
        contribution: &GoalContribution,
        conn: &mut SqliteConnection,
    ) -> Result<GoalContribution>;

    fn list_by_user(&self, user_id: &str) -> Result<Vec<Goal>>;

    fn list_contributions(&self, goal_id: &str) -> Result<Vec<GoalContribution>>;
}
