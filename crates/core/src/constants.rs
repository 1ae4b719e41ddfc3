/// Penalty taken on early withdrawal, as a percentage of the locked amount.
pub const EARLY_WITHDRAWAL_PENALTY_PERCENT: i64 = 10;

/// Minimum lock period for a locked saving, in days.
pub const MIN_LOCK_DAYS: i32 = 1;

/// Maximum lock period for a locked saving, in days.
pub const MAX_LOCK_DAYS: i32 = 365;

/// Default page size for transaction listings.
pub const DEFAULT_TRANSACTION_LIMIT: i64 = 50;

/// Hard cap on transaction listing page size.
pub const MAX_TRANSACTION_LIMIT: i64 = 100;

/// Smallest currency units per display unit (paise per rupee).
pub const UNITS_PER_RUPEE: i64 = 100;
