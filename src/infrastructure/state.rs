//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{
    BudgetLimitRepository, BudgetRepository, CategoryRepository, FamilyRepository,
    GoalRepository, NotificationRepository, RegularPaymentRepository, TransactionRepository,
    UserRepository,
};
use crate::infrastructure::{
    SeaOrmBudgetLimitRepository, SeaOrmBudgetRepository, SeaOrmCategoryRepository,
    SeaOrmFamilyRepository, SeaOrmGoalRepository, SeaOrmNotificationRepository,
    SeaOrmRegularPaymentRepository, SeaOrmTransactionRepository, SeaOrmUserRepository,
};

/// Tunables the services read at request time
#[derive(Clone, Debug)]
pub struct Settings {
    pub jwt_ttl_hours: i64,
    pub limit_warning_percent: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jwt_ttl_hours: 24,
            limit_warning_percent: 80.0,
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub settings: Settings,
    pub users: Arc<dyn UserRepository>,
    pub families: Arc<dyn FamilyRepository>,
    pub budgets: Arc<dyn BudgetRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub limits: Arc<dyn BudgetLimitRepository>,
    pub goals: Arc<dyn GoalRepository>,
    pub regular_payments: Arc<dyn RegularPaymentRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_settings(db, Settings::default())
    }

    pub fn with_settings(db: DatabaseConnection, settings: Settings) -> Self {
        Self {
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            families: Arc::new(SeaOrmFamilyRepository::new(db.clone())),
            budgets: Arc::new(SeaOrmBudgetRepository::new(db.clone())),
            categories: Arc::new(SeaOrmCategoryRepository::new(db.clone())),
            transactions: Arc::new(SeaOrmTransactionRepository::new(db.clone())),
            limits: Arc::new(SeaOrmBudgetLimitRepository::new(db.clone())),
            goals: Arc::new(SeaOrmGoalRepository::new(db.clone())),
            regular_payments: Arc::new(SeaOrmRegularPaymentRepository::new(db.clone())),
            notifications: Arc::new(SeaOrmNotificationRepository::new(db.clone())),
            settings,
            db,
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
