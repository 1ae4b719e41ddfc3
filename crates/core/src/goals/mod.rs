//! Goals module - product-purchase savings targets and their contributions.

mod goals_constants;
mod goals_errors;
mod goals_model;
mod goals_traits;


// Re-export the public interface
pub use goals_constants::*;
pub use goals_errors::GoalError;
pub use goals_model::{
    CancellationSummary, ContributionSummary, Goal, GoalContribution, GoalDetail, GoalStatus,
    GoalTransition, NewContribution, NewGoal,
};
pub use goals_traits::GoalRepositoryTrait;
