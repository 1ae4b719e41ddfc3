//! Tests for wallet domain models.

#[cfg(test)]
mod tests {
    use crate::wallets::{NewDeposit, NewRewardCredit, Wallet};
    use chrono::Utc;

    // ==================== Wallet Tests ====================

    #[test]
    fn test_new_wallet_starts_empty() {
        let now = Utc::now();
        let wallet = Wallet::new("user-1", now);

        assert_eq!(wallet.user_id, "user-1");
        assert_eq!(wallet.balance, 0);
        assert_eq!(wallet.created_at, now);
        assert_eq!(wallet.updated_at, now);
        assert!(!wallet.id.is_empty());
    }

    #[test]
    fn test_can_cover_boundaries() {
        let mut wallet = Wallet::new("user-1", Utc::now());
        wallet.balance = 500;

        assert!(wallet.can_cover(499));
        assert!(wallet.can_cover(500));
        assert!(!wallet.can_cover(501));
        assert!(wallet.can_cover(0));
    }

    // ==================== NewDeposit Validation Tests ====================

    #[test]
    fn test_deposit_validate_accepts_positive_amount() {
        let deposit = NewDeposit {
            amount: 1,
            description: None,
        };
        assert!(deposit.validate().is_ok());
    }

    #[test]
    fn test_deposit_validate_rejects_zero_amount() {
        let deposit = NewDeposit {
            amount: 0,
            description: None,
        };
        let err = deposit.validate().unwrap_err();
        assert_eq!(err.code(), "INVALID_AMOUNT");
    }

    #[test]
    fn test_deposit_validate_rejects_negative_amount() {
        let deposit = NewDeposit {
            amount: -100,
            description: Some("bogus".to_string()),
        };
        let err = deposit.validate().unwrap_err();
        assert_eq!(err.code(), "INVALID_AMOUNT");
    }

    // ==================== NewRewardCredit Validation Tests ====================

    #[test]
    fn test_reward_credit_validate_rejects_non_positive_amount() {
        let credit = NewRewardCredit {
            amount: 0,
            reference_id: Some("reward-1".to_string()),
            description: None,
        };
        let err = credit.validate().unwrap_err();
        assert_eq!(err.code(), "INVALID_AMOUNT");
    }

    #[test]
    fn test_reward_credit_validate_accepts_positive_amount() {
        let credit = NewRewardCredit {
            amount: 250,
            reference_id: None,
            description: Some("Signup bonus".to_string()),
        };
        assert!(credit.validate().is_ok());
    }
}
