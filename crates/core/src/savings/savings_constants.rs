/// Savings statuses
///
/// Each constant is the stored string form of one lifecycle state.
/// A saving leaves `active` exactly once and never returns.

/// Lock is in force; the amount is committed until the unlock date.
pub const SAVINGS_STATUS_ACTIVE: &str = "active";

/// Withdrawn on or after the unlock date; full amount credited.
pub const SAVINGS_STATUS_WITHDRAWN: &str = "withdrawn";

/// Withdrawn before the unlock date; penalty deducted from the credit.
pub const SAVINGS_STATUS_EARLY_WITHDRAWAL: &str = "early_withdrawal";
