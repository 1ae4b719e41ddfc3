//! Status values for savings goals.

/// Goal is open and accepts contributions.
pub const GOAL_STATUS_ACTIVE: &str = "active";

/// Goal reached its target; terminal.
pub const GOAL_STATUS_COMPLETED: &str = "completed";

/// Goal was cancelled and its funds refunded; terminal.
pub const GOAL_STATUS_CANCELLED: &str = "cancelled";
