#[cfg(test)]
mod tests {
    use crate::clock::Clock;
    use crate::db::DbPool;
    use crate::errors::{Error, Result};
    use crate::goals::{
        Goal, GoalContribution, GoalError, GoalRepositoryTrait, GoalStatus, GoalTransition,
        NewContribution, NewGoal,
    };
    use crate::ledger::{
        LedgerService, LedgerServiceTrait, Transaction, TransactionFilter,
        TransactionRepositoryTrait, TransactionType,
    };
    use crate::products::{Product, ProductCatalogTrait};
    use crate::savings::{
        LockedSaving, NewLockedSaving, SavingsRepositoryTrait, SavingsStatus, SavingsWithdrawal,
    };
    use crate::wallets::{NewDeposit, NewRewardCredit, Wallet, WalletError, WalletRepositoryTrait};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use diesel::r2d2::{ConnectionManager, Pool};
    use diesel::sqlite::SqliteConnection;
    use std::sync::{Arc, Mutex};

    // --- Fixed Clock ---
    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    // --- Mock WalletRepository ---
    #[derive(Clone)]
    struct MockWalletRepository {
        wallets: Arc<Mutex<Vec<Wallet>>>,
    }

    impl MockWalletRepository {
        fn new() -> Self {
            Self {
                wallets: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn with_balance(user_id: &str, balance: i64, now: DateTime<Utc>) -> Self {
            let mut wallet = Wallet::new(user_id, now);
            wallet.balance = balance;
            Self {
                wallets: Arc::new(Mutex::new(vec![wallet])),
            }
        }

        fn balance_of(&self, user_id: &str) -> i64 {
            self.wallets
                .lock()
                .unwrap()
                .iter()
                .find(|w| w.user_id == user_id)
                .map(|w| w.balance)
                .unwrap_or(0)
        }

        fn wallet_count(&self) -> usize {
            self.wallets.lock().unwrap().len()
        }
    }

    impl WalletRepositoryTrait for MockWalletRepository {
        fn find_by_user_id(&self, user_id: &str) -> Result<Option<Wallet>> {
            Ok(self
                .wallets
                .lock()
                .unwrap()
                .iter()
                .find(|w| w.user_id == user_id)
                .cloned())
        }

        fn get_or_create_in_transaction(
            &self,
            user_id: &str,
            now: DateTime<Utc>,
            _conn: &mut SqliteConnection,
        ) -> Result<Wallet> {
            let mut wallets = self.wallets.lock().unwrap();
            if let Some(wallet) = wallets.iter().find(|w| w.user_id == user_id) {
                return Ok(wallet.clone());
            }
            let wallet = Wallet::new(user_id, now);
            wallets.push(wallet.clone());
            Ok(wallet)
        }

        fn adjust_balance_in_transaction(
            &self,
            user_id: &str,
            delta: i64,
            now: DateTime<Utc>,
            _conn: &mut SqliteConnection,
        ) -> Result<Wallet> {
            let mut wallets = self.wallets.lock().unwrap();
            let wallet = wallets
                .iter_mut()
                .find(|w| w.user_id == user_id)
                .ok_or_else(|| Error::Unexpected("Wallet not found".to_string()))?;
            wallet.balance += delta;
            wallet.updated_at = now;
            Ok(wallet.clone())
        }
    }

    // --- Mock SavingsRepository ---
    #[derive(Clone)]
    struct MockSavingsRepository {
        savings: Arc<Mutex<Vec<LockedSaving>>>,
    }

    impl MockSavingsRepository {
        fn new() -> Self {
            Self {
                savings: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn add_saving(&self, saving: LockedSaving) {
            self.savings.lock().unwrap().push(saving);
        }

        fn get(&self, savings_id: &str) -> Option<LockedSaving> {
            self.savings
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == savings_id)
                .cloned()
        }

        fn count(&self) -> usize {
            self.savings.lock().unwrap().len()
        }
    }

    impl SavingsRepositoryTrait for MockSavingsRepository {
        fn find_by_id(&self, savings_id: &str) -> Result<Option<LockedSaving>> {
            Ok(self.get(savings_id))
        }

        fn find_by_id_in_transaction(
            &self,
            savings_id: &str,
            _conn: &mut SqliteConnection,
        ) -> Result<Option<LockedSaving>> {
            Ok(self.get(savings_id))
        }

        fn create_in_transaction(
            &self,
            saving: &LockedSaving,
            _conn: &mut SqliteConnection,
        ) -> Result<LockedSaving> {
            self.savings.lock().unwrap().push(saving.clone());
            Ok(saving.clone())
        }

        fn apply_withdrawal_in_transaction(
            &self,
            withdrawal: &SavingsWithdrawal,
            _conn: &mut SqliteConnection,
        ) -> Result<LockedSaving> {
            let mut savings = self.savings.lock().unwrap();
            let record = savings
                .iter_mut()
                .find(|s| s.id == withdrawal.savings_id)
                .ok_or_else(|| Error::Unexpected("Savings record not found".to_string()))?;
            record.status = withdrawal.status;
            record.withdrawn_at = Some(withdrawal.withdrawn_at);
            record.penalty_amount = Some(withdrawal.penalty_amount);
            record.final_amount = Some(withdrawal.final_amount);
            Ok(record.clone())
        }

        fn list_by_user(
            &self,
            user_id: &str,
            status: Option<SavingsStatus>,
        ) -> Result<Vec<LockedSaving>> {
            Ok(self
                .savings
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.user_id == user_id)
                .filter(|s| status.map_or(true, |st| s.status == st))
                .cloned()
                .collect())
        }
    }

    // --- Mock GoalRepository ---
    #[derive(Clone)]
    struct MockGoalRepository {
        goals: Arc<Mutex<Vec<Goal>>>,
        contributions: Arc<Mutex<Vec<GoalContribution>>>,
    }

    impl MockGoalRepository {
        fn new() -> Self {
            Self {
                goals: Arc::new(Mutex::new(Vec::new())),
                contributions: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn add_goal(&self, goal: Goal) {
            self.goals.lock().unwrap().push(goal);
        }

        fn get(&self, goal_id: &str) -> Option<Goal> {
            self.goals
                .lock()
                .unwrap()
                .iter()
                .find(|g| g.id == goal_id)
                .cloned()
        }

        fn contribution_count(&self) -> usize {
            self.contributions.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GoalRepositoryTrait for MockGoalRepository {
        fn find_by_id(&self, goal_id: &str) -> Result<Option<Goal>> {
            Ok(self.get(goal_id))
        }

        fn find_by_id_in_transaction(
            &self,
            goal_id: &str,
            _conn: &mut SqliteConnection,
        ) -> Result<Option<Goal>> {
            Ok(self.get(goal_id))
        }

        async fn create(&self, goal: &Goal) -> Result<Goal> {
            self.goals.lock().unwrap().push(goal.clone());
            Ok(goal.clone())
        }

        fn apply_transition_in_transaction(
            &self,
            transition: &GoalTransition,
            _conn: &mut SqliteConnection,
        ) -> Result<Goal> {
            let mut goals = self.goals.lock().unwrap();
            let goal = goals
                .iter_mut()
                .find(|g| g.id == transition.goal_id)
                .ok_or_else(|| Error::Unexpected("Goal not found".to_string()))?;
            goal.current_amount = transition.current_amount;
            goal.status = transition.status;
            goal.completed_at = transition.completed_at;
            goal.updated_at = transition.updated_at;
            Ok(goal.clone())
        }

        fn insert_contribution_in_transaction(
            &self,
            contribution: &GoalContribution,
            _conn: &mut SqliteConnection,
        ) -> Result<GoalContribution> {
            self.contributions.lock().unwrap().push(contribution.clone());
            Ok(contribution.clone())
        }

        fn list_by_user(&self, user_id: &str) -> Result<Vec<Goal>> {
            Ok(self
                .goals
                .lock()
                .unwrap()
                .iter()
                .filter(|g| g.user_id == user_id)
                .cloned()
                .collect())
        }

        fn list_contributions(&self, goal_id: &str) -> Result<Vec<GoalContribution>> {
            Ok(self
                .contributions
                .lock()
                .unwrap()
                .iter()
                .filter(|c| c.goal_id == goal_id)
                .cloned()
                .collect())
        }
    }

    // --- Mock TransactionRepository ---
    #[derive(Clone)]
    struct MockTransactionRepository {
        transactions: Arc<Mutex<Vec<Transaction>>>,
    }

    impl MockTransactionRepository {
        fn new() -> Self {
            Self {
                transactions: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn all(&self) -> Vec<Transaction> {
            self.transactions.lock().unwrap().clone()
        }

        fn sum_of(&self, user_id: &str) -> i64 {
            self.transactions
                .lock()
                .unwrap()
                .iter()
                .filter(|t| t.user_id == user_id)
                .map(|t| t.amount)
                .sum()
        }
    }

    impl TransactionRepositoryTrait for MockTransactionRepository {
        fn append_in_transaction(
            &self,
            transaction: &Transaction,
            _conn: &mut SqliteConnection,
        ) -> Result<Transaction> {
            self.transactions.lock().unwrap().push(transaction.clone());
            Ok(transaction.clone())
        }

        fn list_by_user(
            &self,
            user_id: &str,
            filter: &TransactionFilter,
        ) -> Result<Vec<Transaction>> {
            let transactions = self.transactions.lock().unwrap();
            let mut rows: Vec<Transaction> = transactions
                .iter()
                .filter(|t| t.user_id == user_id)
                .filter(|t| {
                    filter
                        .transaction_type
                        .map_or(true, |tt| t.transaction_type == tt)
                })
                .cloned()
                .collect();
            rows.reverse();
            rows.truncate(filter.effective_limit() as usize);
            Ok(rows)
        }

        fn sum_for_user(&self, user_id: &str) -> Result<i64> {
            Ok(self.sum_of(user_id))
        }
    }

    // --- Mock ProductCatalog ---
    #[derive(Clone)]
    struct MockProductCatalog {
        products: Arc<Mutex<Vec<Product>>>,
    }

    impl MockProductCatalog {
        fn new() -> Self {
            Self {
                products: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn add_product(&self, product: Product) {
            self.products.lock().unwrap().push(product);
        }
    }

    #[async_trait]
    impl ProductCatalogTrait for MockProductCatalog {
        async fn get_product(&self, product_id: &str) -> Result<Option<Product>> {
            Ok(self
                .products
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == product_id)
                .cloned())
        }
    }

    // ==================== Helpers ====================

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
    }

    // The executor runs against a real in-memory database; the mocks ignore
    // the connection, so no schema is needed.
    fn test_executor() -> Arc<DbPool> {
        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = Pool::builder().max_size(1).build(manager).unwrap();
        Arc::new(pool)
    }

    fn build_service(
        wallet_repository: Arc<MockWalletRepository>,
        savings_repository: Arc<MockSavingsRepository>,
        goal_repository: Arc<MockGoalRepository>,
        transaction_repository: Arc<MockTransactionRepository>,
        product_catalog: Arc<MockProductCatalog>,
        now: DateTime<Utc>,
    ) -> LedgerService<Arc<DbPool>> {
        LedgerService::new(
            wallet_repository,
            savings_repository,
            goal_repository,
            transaction_repository,
            product_catalog,
            Arc::new(FixedClock(now)),
            test_executor(),
        )
    }

    fn create_test_product(id: &str, price: i64, available: bool) -> Product {
        Product {
            id: id.to_string(),
            name: "Cricket bat".to_string(),
            image_url: Some("https://cdn.example/bat.png".to_string()),
            price,
            available,
        }
    }

    fn create_active_goal(user_id: &str, target_amount: i64, now: DateTime<Utc>) -> Goal {
        let product = create_test_product("prod-1", target_amount, true);
        let payload = NewGoal {
            product_id: product.id.clone(),
            target_amount,
        };
        Goal::new(user_id, &payload, &product, now)
    }

    fn create_active_saving(
        user_id: &str,
        amount: i64,
        lock_days: i32,
        locked_at: DateTime<Utc>,
    ) -> LockedSaving {
        let payload = NewLockedSaving { amount, lock_days };
        LockedSaving::new(user_id, &payload, locked_at)
    }

    // ==================== Deposit Tests ====================

    #[tokio::test]
    async fn test_deposit_credits_wallet_and_appends_ledger() {
        let wallet_repository = Arc::new(MockWalletRepository::new());
        let transaction_repository = Arc::new(MockTransactionRepository::new());
        let service = build_service(
            wallet_repository.clone(),
            Arc::new(MockSavingsRepository::new()),
            Arc::new(MockGoalRepository::new()),
            transaction_repository.clone(),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let payload = NewDeposit {
            amount: 1_000,
            description: None,
        };
        let summary = service.deposit("user-1", payload).await.unwrap();

        assert_eq!(summary.balance, 1_000);
        assert_eq!(summary.transaction.transaction_type, TransactionType::Deposit);
        assert_eq!(summary.transaction.amount, 1_000);
        assert_eq!(wallet_repository.balance_of("user-1"), 1_000);

        let rows = transaction_repository.all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 1_000);
        assert!(rows[0].reference_id.is_none());
    }

    #[tokio::test]
    async fn test_deposit_creates_wallet_lazily() {
        let wallet_repository = Arc::new(MockWalletRepository::new());
        let service = build_service(
            wallet_repository.clone(),
            Arc::new(MockSavingsRepository::new()),
            Arc::new(MockGoalRepository::new()),
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        assert_eq!(wallet_repository.wallet_count(), 0);
        let payload = NewDeposit {
            amount: 500,
            description: Some("first deposit".to_string()),
        };
        service.deposit("user-1", payload).await.unwrap();
        assert_eq!(wallet_repository.wallet_count(), 1);
    }

    #[tokio::test]
    async fn test_deposit_rejects_non_positive_amount() {
        let wallet_repository = Arc::new(MockWalletRepository::new());
        let transaction_repository = Arc::new(MockTransactionRepository::new());
        let service = build_service(
            wallet_repository.clone(),
            Arc::new(MockSavingsRepository::new()),
            Arc::new(MockGoalRepository::new()),
            transaction_repository.clone(),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let payload = NewDeposit {
            amount: 0,
            description: None,
        };
        let err = service.deposit("user-1", payload).await.unwrap_err();

        assert_eq!(err.code(), "INVALID_AMOUNT");
        assert_eq!(wallet_repository.wallet_count(), 0);
        assert!(transaction_repository.all().is_empty());
    }

    // ==================== Lock Tests ====================

    #[tokio::test]
    async fn test_lock_savings_debits_wallet() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 5_000, test_time()));
        let savings_repository = Arc::new(MockSavingsRepository::new());
        let transaction_repository = Arc::new(MockTransactionRepository::new());
        let service = build_service(
            wallet_repository.clone(),
            savings_repository.clone(),
            Arc::new(MockGoalRepository::new()),
            transaction_repository.clone(),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let payload = NewLockedSaving {
            amount: 2_000,
            lock_days: 30,
        };
        let saving = service.lock_savings("user-1", payload).await.unwrap();

        assert_eq!(saving.status, SavingsStatus::Active);
        assert_eq!(saving.unlock_at, test_time() + Duration::days(30));
        assert_eq!(savings_repository.count(), 1);
        assert_eq!(wallet_repository.balance_of("user-1"), 3_000);

        let rows = transaction_repository.all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_type, TransactionType::Lock);
        assert_eq!(rows[0].amount, -2_000);
        assert_eq!(rows[0].reference_id.as_deref(), Some(saving.id.as_str()));
    }

    #[tokio::test]
    async fn test_lock_savings_insufficient_balance_writes_nothing() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 100, test_time()));
        let savings_repository = Arc::new(MockSavingsRepository::new());
        let transaction_repository = Arc::new(MockTransactionRepository::new());
        let service = build_service(
            wallet_repository.clone(),
            savings_repository.clone(),
            Arc::new(MockGoalRepository::new()),
            transaction_repository.clone(),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let payload = NewLockedSaving {
            amount: 2_000,
            lock_days: 30,
        };
        let err = service.lock_savings("user-1", payload).await.unwrap_err();

        match err {
            Error::Wallet(WalletError::InsufficientBalance {
                available,
                required,
            }) => {
                assert_eq!(available, 100);
                assert_eq!(required, 2_000);
            }
            other => panic!("Expected InsufficientBalance, got {:?}", other),
        }
        assert_eq!(savings_repository.count(), 0);
        assert!(transaction_repository.all().is_empty());
        assert_eq!(wallet_repository.balance_of("user-1"), 100);
    }

    #[tokio::test]
    async fn test_lock_savings_validates_payload() {
        let service = build_service(
            Arc::new(MockWalletRepository::new()),
            Arc::new(MockSavingsRepository::new()),
            Arc::new(MockGoalRepository::new()),
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let zero_amount = NewLockedSaving {
            amount: 0,
            lock_days: 30,
        };
        let err = service.lock_savings("user-1", zero_amount).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_AMOUNT");

        let zero_days = NewLockedSaving {
            amount: 1_000,
            lock_days: 0,
        };
        let err = service.lock_savings("user-1", zero_days).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_LOCK_DAYS");

        let too_long = NewLockedSaving {
            amount: 1_000,
            lock_days: 366,
        };
        let err = service.lock_savings("user-1", too_long).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_LOCK_DAYS");
    }

    // ==================== Withdrawal Tests ====================

    #[tokio::test]
    async fn test_early_withdrawal_charges_penalty() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 0, test_time()));
        let savings_repository = Arc::new(MockSavingsRepository::new());
        let transaction_repository = Arc::new(MockTransactionRepository::new());

        // Locked today for 30 days, withdrawn immediately
        let saving = create_active_saving("user-1", 1_000, 30, test_time());
        savings_repository.add_saving(saving.clone());

        let service = build_service(
            wallet_repository.clone(),
            savings_repository.clone(),
            Arc::new(MockGoalRepository::new()),
            transaction_repository.clone(),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let summary = service.withdraw_savings("user-1", &saving.id).await.unwrap();

        assert!(summary.is_early_withdrawal);
        assert_eq!(summary.original_amount, 1_000);
        assert_eq!(summary.penalty, 100);
        assert_eq!(summary.withdrawn_amount, 900);
        assert_eq!(summary.status, SavingsStatus::EarlyWithdrawal);
        assert_eq!(summary.wallet_balance, 900);

        let updated = savings_repository.get(&saving.id).unwrap();
        assert_eq!(updated.status, SavingsStatus::EarlyWithdrawal);
        assert_eq!(updated.penalty_amount, Some(100));
        assert_eq!(updated.final_amount, Some(900));
        assert_eq!(updated.withdrawn_at, Some(test_time()));

        // One combined ledger row, not a separate penalty or deposit row
        let rows = transaction_repository.all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_type, TransactionType::EarlyWithdrawal);
        assert_eq!(rows[0].amount, 900);
        assert_eq!(rows[0].penalty, Some(100));
    }

    #[tokio::test]
    async fn test_on_time_withdrawal_is_penalty_free() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 0, test_time()));
        let savings_repository = Arc::new(MockSavingsRepository::new());
        let transaction_repository = Arc::new(MockTransactionRepository::new());

        // Locked 31 days ago for 30 days, so the lock has matured
        let saving = create_active_saving("user-1", 1_000, 30, test_time() - Duration::days(31));
        savings_repository.add_saving(saving.clone());

        let service = build_service(
            wallet_repository.clone(),
            savings_repository.clone(),
            Arc::new(MockGoalRepository::new()),
            transaction_repository.clone(),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let summary = service.withdraw_savings("user-1", &saving.id).await.unwrap();

        assert!(!summary.is_early_withdrawal);
        assert_eq!(summary.penalty, 0);
        assert_eq!(summary.withdrawn_amount, 1_000);
        assert_eq!(summary.status, SavingsStatus::Withdrawn);
        assert_eq!(wallet_repository.balance_of("user-1"), 1_000);

        let rows = transaction_repository.all();
        assert_eq!(rows[0].transaction_type, TransactionType::Withdrawal);
        assert_eq!(rows[0].amount, 1_000);
        assert_eq!(rows[0].penalty, Some(0));
    }

    #[tokio::test]
    async fn test_withdraw_unknown_savings_fails() {
        let service = build_service(
            Arc::new(MockWalletRepository::new()),
            Arc::new(MockSavingsRepository::new()),
            Arc::new(MockGoalRepository::new()),
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let err = service
            .withdraw_savings("user-1", "missing-id")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "SAVINGS_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_withdraw_foreign_savings_forbidden() {
        let savings_repository = Arc::new(MockSavingsRepository::new());
        let saving = create_active_saving("someone-else", 1_000, 30, test_time());
        savings_repository.add_saving(saving.clone());

        let service = build_service(
            Arc::new(MockWalletRepository::new()),
            savings_repository.clone(),
            Arc::new(MockGoalRepository::new()),
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let err = service
            .withdraw_savings("user-1", &saving.id)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "FORBIDDEN");
        // Untouched
        assert_eq!(
            savings_repository.get(&saving.id).unwrap().status,
            SavingsStatus::Active
        );
    }

    #[tokio::test]
    async fn test_second_withdrawal_fails() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 0, test_time()));
        let savings_repository = Arc::new(MockSavingsRepository::new());
        let saving = create_active_saving("user-1", 1_000, 30, test_time());
        savings_repository.add_saving(saving.clone());

        let service = build_service(
            wallet_repository.clone(),
            savings_repository.clone(),
            Arc::new(MockGoalRepository::new()),
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        service.withdraw_savings("user-1", &saving.id).await.unwrap();
        let err = service
            .withdraw_savings("user-1", &saving.id)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "ALREADY_WITHDRAWN");
        // Credited exactly once
        assert_eq!(wallet_repository.balance_of("user-1"), 900);
    }

    // ==================== Goal Creation Tests ====================

    #[tokio::test]
    async fn test_create_goal_snapshots_product() {
        let goal_repository = Arc::new(MockGoalRepository::new());
        let transaction_repository = Arc::new(MockTransactionRepository::new());
        let product_catalog = Arc::new(MockProductCatalog::new());
        product_catalog.add_product(create_test_product("prod-1", 50_000, true));

        let service = build_service(
            Arc::new(MockWalletRepository::new()),
            Arc::new(MockSavingsRepository::new()),
            goal_repository.clone(),
            transaction_repository.clone(),
            product_catalog,
            test_time(),
        );

        let payload = NewGoal {
            product_id: "prod-1".to_string(),
            target_amount: 50_000,
        };
        let goal = service.create_goal("user-1", payload).await.unwrap();

        assert_eq!(goal.product_name, "Cricket bat");
        assert_eq!(goal.status, GoalStatus::Active);
        assert_eq!(goal.current_amount, 0);
        assert!(goal_repository.get(&goal.id).is_some());
        // Creating a goal moves no money
        assert!(transaction_repository.all().is_empty());
    }

    #[tokio::test]
    async fn test_create_goal_unknown_product_fails() {
        let service = build_service(
            Arc::new(MockWalletRepository::new()),
            Arc::new(MockSavingsRepository::new()),
            Arc::new(MockGoalRepository::new()),
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let payload = NewGoal {
            product_id: "missing".to_string(),
            target_amount: 1_000,
        };
        let err = service.create_goal("user-1", payload).await.unwrap_err();
        assert_eq!(err.code(), "PRODUCT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create_goal_unavailable_product_fails() {
        let product_catalog = Arc::new(MockProductCatalog::new());
        product_catalog.add_product(create_test_product("prod-1", 50_000, false));

        let service = build_service(
            Arc::new(MockWalletRepository::new()),
            Arc::new(MockSavingsRepository::new()),
            Arc::new(MockGoalRepository::new()),
            Arc::new(MockTransactionRepository::new()),
            product_catalog,
            test_time(),
        );

        let payload = NewGoal {
            product_id: "prod-1".to_string(),
            target_amount: 50_000,
        };
        let err = service.create_goal("user-1", payload).await.unwrap_err();
        assert_eq!(err.code(), "PRODUCT_NOT_AVAILABLE");
    }

    // ==================== Contribution Tests ====================

    #[tokio::test]
    async fn test_contribution_moves_wallet_money_into_goal() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 500, test_time()));
        let goal_repository = Arc::new(MockGoalRepository::new());
        let transaction_repository = Arc::new(MockTransactionRepository::new());
        let goal = create_active_goal("user-1", 500, test_time());
        goal_repository.add_goal(goal.clone());

        let service = build_service(
            wallet_repository.clone(),
            Arc::new(MockSavingsRepository::new()),
            goal_repository.clone(),
            transaction_repository.clone(),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let payload = NewContribution {
            amount: 200,
            notes: Some("pocket money".to_string()),
        };
        let summary = service
            .contribute_to_goal("user-1", &goal.id, payload)
            .await
            .unwrap();

        assert!(!summary.goal_completed);
        assert_eq!(summary.goal.current_amount, 200);
        assert_eq!(summary.goal.status, GoalStatus::Active);
        assert_eq!(summary.wallet_balance, 300);
        assert_eq!(summary.contribution.amount, 200);
        assert_eq!(goal_repository.contribution_count(), 1);

        let rows = transaction_repository.all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_type, TransactionType::GoalAllocation);
        assert_eq!(rows[0].amount, -200);
        assert_eq!(
            rows[0].reference_id.as_deref(),
            Some(summary.contribution.id.as_str())
        );
    }

    #[tokio::test]
    async fn test_contribution_reaching_target_completes_goal() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 500, test_time()));
        let goal_repository = Arc::new(MockGoalRepository::new());
        let goal = create_active_goal("user-1", 500, test_time());
        goal_repository.add_goal(goal.clone());

        let service = build_service(
            wallet_repository.clone(),
            Arc::new(MockSavingsRepository::new()),
            goal_repository.clone(),
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let payload = NewContribution {
            amount: 500,
            notes: None,
        };
        let summary = service
            .contribute_to_goal("user-1", &goal.id, payload)
            .await
            .unwrap();

        assert!(summary.goal_completed);
        assert_eq!(summary.goal.status, GoalStatus::Completed);
        assert_eq!(summary.goal.completed_at, Some(test_time()));
        assert_eq!(summary.wallet_balance, 0);
    }

    #[tokio::test]
    async fn test_contribution_below_target_stays_active() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 500, test_time()));
        let goal_repository = Arc::new(MockGoalRepository::new());
        let mut goal = create_active_goal("user-1", 500, test_time());
        goal.current_amount = 400;
        goal_repository.add_goal(goal.clone());

        let service = build_service(
            wallet_repository,
            Arc::new(MockSavingsRepository::new()),
            goal_repository.clone(),
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let payload = NewContribution {
            amount: 99,
            notes: None,
        };
        let summary = service
            .contribute_to_goal("user-1", &goal.id, payload)
            .await
            .unwrap();

        assert!(!summary.goal_completed);
        assert_eq!(summary.goal.current_amount, 499);
        assert_eq!(summary.goal.status, GoalStatus::Active);
        assert!(summary.goal.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_contribution_insufficient_balance_leaves_no_trace() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 100, test_time()));
        let goal_repository = Arc::new(MockGoalRepository::new());
        let transaction_repository = Arc::new(MockTransactionRepository::new());
        let goal = create_active_goal("user-1", 500, test_time());
        goal_repository.add_goal(goal.clone());

        let service = build_service(
            wallet_repository.clone(),
            Arc::new(MockSavingsRepository::new()),
            goal_repository.clone(),
            transaction_repository.clone(),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let payload = NewContribution {
            amount: 200,
            notes: None,
        };
        let err = service
            .contribute_to_goal("user-1", &goal.id, payload)
            .await
            .unwrap_err();

        match err {
            Error::Wallet(WalletError::InsufficientBalance {
                available,
                required,
            }) => {
                assert_eq!(available, 100);
                assert_eq!(required, 200);
            }
            other => panic!("Expected InsufficientBalance, got {:?}", other),
        }
        assert_eq!(goal_repository.get(&goal.id).unwrap().current_amount, 0);
        assert_eq!(goal_repository.contribution_count(), 0);
        assert!(transaction_repository.all().is_empty());
        assert_eq!(wallet_repository.balance_of("user-1"), 100);
    }

    #[tokio::test]
    async fn test_contribution_to_completed_goal_rejected() {
        let goal_repository = Arc::new(MockGoalRepository::new());
        let mut goal = create_active_goal("user-1", 500, test_time());
        goal.status = GoalStatus::Completed;
        goal.current_amount = 500;
        goal.completed_at = Some(test_time());
        goal_repository.add_goal(goal.clone());

        let service = build_service(
            Arc::new(MockWalletRepository::with_balance("user-1", 1_000, test_time())),
            Arc::new(MockSavingsRepository::new()),
            goal_repository,
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let payload = NewContribution {
            amount: 100,
            notes: None,
        };
        let err = service
            .contribute_to_goal("user-1", &goal.id, payload)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "GOAL_NOT_ACTIVE");
    }

    #[tokio::test]
    async fn test_contribution_owner_check() {
        let goal_repository = Arc::new(MockGoalRepository::new());
        let goal = create_active_goal("someone-else", 500, test_time());
        goal_repository.add_goal(goal.clone());

        let service = build_service(
            Arc::new(MockWalletRepository::with_balance("user-1", 1_000, test_time())),
            Arc::new(MockSavingsRepository::new()),
            goal_repository,
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let payload = NewContribution {
            amount: 100,
            notes: None,
        };
        let err = service
            .contribute_to_goal("user-1", &goal.id, payload)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");

        let unknown = service
            .contribute_to_goal(
                "user-1",
                "missing-goal",
                NewContribution {
                    amount: 100,
                    notes: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(unknown.code(), "GOAL_NOT_FOUND");
    }

    // ==================== Goal Completion Tests ====================

    #[tokio::test]
    async fn test_complete_goal_requires_full_funding() {
        let goal_repository = Arc::new(MockGoalRepository::new());
        let mut goal = create_active_goal("user-1", 500, test_time());
        goal.current_amount = 400;
        goal_repository.add_goal(goal.clone());

        let service = build_service(
            Arc::new(MockWalletRepository::new()),
            Arc::new(MockSavingsRepository::new()),
            goal_repository.clone(),
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let err = service.complete_goal("user-1", &goal.id).await.unwrap_err();
        match err {
            Error::Goal(GoalError::NotFullyFunded {
                current_amount,
                target_amount,
                remaining,
            }) => {
                assert_eq!(current_amount, 400);
                assert_eq!(target_amount, 500);
                assert_eq!(remaining, 100);
            }
            other => panic!("Expected NotFullyFunded, got {:?}", other),
        }
        assert_eq!(
            goal_repository.get(&goal.id).unwrap().status,
            GoalStatus::Active
        );
    }

    #[tokio::test]
    async fn test_complete_fully_funded_goal() {
        let goal_repository = Arc::new(MockGoalRepository::new());
        let mut goal = create_active_goal("user-1", 500, test_time());
        goal.current_amount = 500;
        goal_repository.add_goal(goal.clone());

        let service = build_service(
            Arc::new(MockWalletRepository::new()),
            Arc::new(MockSavingsRepository::new()),
            goal_repository.clone(),
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let completed = service.complete_goal("user-1", &goal.id).await.unwrap();

        assert_eq!(completed.status, GoalStatus::Completed);
        assert_eq!(completed.completed_at, Some(test_time()));

        // Second completion reports the state conflict
        let err = service.complete_goal("user-1", &goal.id).await.unwrap_err();
        assert_eq!(err.code(), "GOAL_NOT_ACTIVE");
    }

    // ==================== Goal Cancellation Tests ====================

    #[tokio::test]
    async fn test_cancel_goal_refunds_accumulated_funds() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 50, test_time()));
        let goal_repository = Arc::new(MockGoalRepository::new());
        let transaction_repository = Arc::new(MockTransactionRepository::new());
        let mut goal = create_active_goal("user-1", 500, test_time());
        goal.current_amount = 300;
        goal_repository.add_goal(goal.clone());

        let service = build_service(
            wallet_repository.clone(),
            Arc::new(MockSavingsRepository::new()),
            goal_repository.clone(),
            transaction_repository.clone(),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let summary = service.cancel_goal("user-1", &goal.id).await.unwrap();

        assert_eq!(summary.refunded, 300);
        assert_eq!(summary.wallet_balance, 350);
        assert_eq!(summary.goal.status, GoalStatus::Cancelled);

        let rows = transaction_repository.all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_type, TransactionType::GoalRefund);
        assert_eq!(rows[0].amount, 300);
        assert_eq!(rows[0].reference_id.as_deref(), Some(goal.id.as_str()));
    }

    #[tokio::test]
    async fn test_cancel_unfunded_goal_skips_refund() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 50, test_time()));
        let goal_repository = Arc::new(MockGoalRepository::new());
        let transaction_repository = Arc::new(MockTransactionRepository::new());
        let goal = create_active_goal("user-1", 500, test_time());
        goal_repository.add_goal(goal.clone());

        let service = build_service(
            wallet_repository.clone(),
            Arc::new(MockSavingsRepository::new()),
            goal_repository.clone(),
            transaction_repository.clone(),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let summary = service.cancel_goal("user-1", &goal.id).await.unwrap();

        assert_eq!(summary.refunded, 0);
        assert_eq!(summary.wallet_balance, 50);
        assert_eq!(summary.goal.status, GoalStatus::Cancelled);
        assert!(transaction_repository.all().is_empty());
    }

    // ==================== Reward Tests ====================

    #[tokio::test]
    async fn test_claim_reward_credits_wallet() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 100, test_time()));
        let transaction_repository = Arc::new(MockTransactionRepository::new());

        let service = build_service(
            wallet_repository.clone(),
            Arc::new(MockSavingsRepository::new()),
            Arc::new(MockGoalRepository::new()),
            transaction_repository.clone(),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let payload = NewRewardCredit {
            amount: 250,
            reference_id: Some("campaign-1".to_string()),
            description: None,
        };
        let summary = service.claim_reward("user-1", payload).await.unwrap();

        assert_eq!(summary.balance, 350);
        let rows = transaction_repository.all();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_type, TransactionType::RewardClaim);
        assert_eq!(rows[0].amount, 250);
        assert_eq!(rows[0].reference_id.as_deref(), Some("campaign-1"));
    }

    // ==================== Read Operation Tests ====================

    #[test]
    fn test_get_wallet_creates_lazily() {
        let wallet_repository = Arc::new(MockWalletRepository::new());
        let service = build_service(
            wallet_repository.clone(),
            Arc::new(MockSavingsRepository::new()),
            Arc::new(MockGoalRepository::new()),
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let wallet = service.get_wallet("user-1").unwrap();
        assert_eq!(wallet.balance, 0);
        assert_eq!(wallet_repository.wallet_count(), 1);

        // Second access returns the same wallet
        let again = service.get_wallet("user-1").unwrap();
        assert_eq!(again.id, wallet.id);
        assert_eq!(wallet_repository.wallet_count(), 1);
    }

    #[tokio::test]
    async fn test_list_transactions_respects_filter() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 10_000, test_time()));
        let service = build_service(
            wallet_repository,
            Arc::new(MockSavingsRepository::new()),
            Arc::new(MockGoalRepository::new()),
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        service
            .deposit(
                "user-1",
                NewDeposit {
                    amount: 1_000,
                    description: None,
                },
            )
            .await
            .unwrap();
        service
            .lock_savings(
                "user-1",
                NewLockedSaving {
                    amount: 500,
                    lock_days: 30,
                },
            )
            .await
            .unwrap();

        let all = service
            .list_transactions("user-1", TransactionFilter::default())
            .unwrap();
        assert_eq!(all.len(), 2);
        // Newest first
        assert_eq!(all[0].transaction_type, TransactionType::Lock);

        let deposits_only = service
            .list_transactions(
                "user-1",
                TransactionFilter {
                    transaction_type: Some(TransactionType::Deposit),
                    limit: None,
                },
            )
            .unwrap();
        assert_eq!(deposits_only.len(), 1);
        assert_eq!(deposits_only[0].amount, 1_000);

        let capped = service
            .list_transactions(
                "user-1",
                TransactionFilter {
                    transaction_type: None,
                    limit: Some(1),
                },
            )
            .unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn test_savings_history_aggregates_records() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 10_000, test_time()));
        let savings_repository = Arc::new(MockSavingsRepository::new());
        let service = build_service(
            wallet_repository,
            savings_repository.clone(),
            Arc::new(MockGoalRepository::new()),
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        let kept = service
            .lock_savings(
                "user-1",
                NewLockedSaving {
                    amount: 2_000,
                    lock_days: 90,
                },
            )
            .await
            .unwrap();
        let withdrawn = service
            .lock_savings(
                "user-1",
                NewLockedSaving {
                    amount: 1_000,
                    lock_days: 30,
                },
            )
            .await
            .unwrap();
        service
            .withdraw_savings("user-1", &withdrawn.id)
            .await
            .unwrap();

        let history = service.savings_history("user-1").unwrap();
        assert_eq!(history.savings.len(), 2);
        assert_eq!(history.summary.active_count, 1);
        assert_eq!(history.summary.total_locked, 2_000);
        assert_eq!(history.summary.total_withdrawn, 900);
        assert_eq!(history.summary.total_penalties, 100);

        let active = service.list_active_savings("user-1").unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_get_goal_returns_contribution_history() {
        let wallet_repository =
            Arc::new(MockWalletRepository::with_balance("user-1", 1_000, test_time()));
        let goal_repository = Arc::new(MockGoalRepository::new());
        let goal = create_active_goal("user-1", 500, test_time());
        goal_repository.add_goal(goal.clone());

        let service = build_service(
            wallet_repository,
            Arc::new(MockSavingsRepository::new()),
            goal_repository,
            Arc::new(MockTransactionRepository::new()),
            Arc::new(MockProductCatalog::new()),
            test_time(),
        );

        service
            .contribute_to_goal(
                "user-1",
                &goal.id,
                NewContribution {
                    amount: 100,
                    notes: None,
                },
            )
            .await
            .unwrap();
        service
            .contribute_to_goal(
                "user-1",
                &goal.id,
                NewContribution {
                    amount: 150,
                    notes: None,
                },
            )
            .await
            .unwrap();

        let detail = service.get_goal("user-1", &goal.id).unwrap();
        assert_eq!(detail.goal.current_amount, 250);
        assert_eq!(detail.contributions.len(), 2);

        let forbidden = service.get_goal("intruder", &goal.id).unwrap_err();
        assert_eq!(forbidden.code(), "FORBIDDEN");

        let missing = service.get_goal("user-1", "missing-goal").unwrap_err();
        assert_eq!(missing.code(), "GOAL_NOT_FOUND");
    }

    // ==================== Invariant Tests ====================

    /// After any sequence of operations the signed ledger amounts for a user
    /// sum to exactly the wallet balance.
    #[tokio::test]
    async fn test_ledger_sum_matches_wallet_after_operation_mix() {
        let wallet_repository = Arc::new(MockWalletRepository::new());
        let savings_repository = Arc::new(MockSavingsRepository::new());
        let goal_repository = Arc::new(MockGoalRepository::new());
        let transaction_repository = Arc::new(MockTransactionRepository::new());
        let product_catalog = Arc::new(MockProductCatalog::new());
        product_catalog.add_product(create_test_product("prod-1", 5_000, true));

        let service = build_service(
            wallet_repository.clone(),
            savings_repository.clone(),
            goal_repository.clone(),
            transaction_repository.clone(),
            product_catalog,
            test_time(),
        );

        service
            .deposit(
                "user-1",
                NewDeposit {
                    amount: 1_000,
                    description: None,
                },
            )
            .await
            .unwrap();
        let saving = service
            .lock_savings(
                "user-1",
                NewLockedSaving {
                    amount: 300,
                    lock_days: 30,
                },
            )
            .await
            .unwrap();
        service.withdraw_savings("user-1", &saving.id).await.unwrap();
        let goal = service
            .create_goal(
                "user-1",
                NewGoal {
                    product_id: "prod-1".to_string(),
                    target_amount: 5_000,
                },
            )
            .await
            .unwrap();
        service
            .contribute_to_goal(
                "user-1",
                &goal.id,
                NewContribution {
                    amount: 500,
                    notes: None,
                },
            )
            .await
            .unwrap();
        service.cancel_goal("user-1", &goal.id).await.unwrap();
        service
            .claim_reward(
                "user-1",
                NewRewardCredit {
                    amount: 100,
                    reference_id: None,
                    description: None,
                },
            )
            .await
            .unwrap();

        // 1000 - 300 + 270 - 500 + 500 + 100
        assert_eq!(wallet_repository.balance_of("user-1"), 1_070);
        assert_eq!(transaction_repository.sum_of("user-1"), 1_070);
    }
}
