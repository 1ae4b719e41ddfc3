//! Transaction type values for the ledger.

/// Money added to the wallet from outside.
pub const TRANSACTION_TYPE_DEPOSIT: &str = "deposit";

/// On-time release of a locked saving back to the wallet.
pub const TRANSACTION_TYPE_WITHDRAWAL: &str = "withdrawal";

/// Penalized release of a locked saving before its unlock date.
pub const TRANSACTION_TYPE_EARLY_WITHDRAWAL: &str = "early_withdrawal";

/// Wallet money committed into a locked saving.
pub const TRANSACTION_TYPE_LOCK: &str = "lock";

/// Wallet money contributed toward a goal.
pub const TRANSACTION_TYPE_GOAL_ALLOCATION: &str = "goal_allocation";

/// Accumulated goal funds returned on cancellation.
pub const TRANSACTION_TYPE_GOAL_REFUND: &str = "goal_refund";

/// Promotional or reward credit.
pub const TRANSACTION_TYPE_REWARD_CLAIM: &str = "reward_claim";
