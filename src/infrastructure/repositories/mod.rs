//! Repository implementations using SeaORM

pub mod budget_limit_repository;
pub mod budget_repository;
pub mod category_repository;
pub mod family_repository;
pub mod goal_repository;
pub mod notification_repository;
pub mod regular_payment_repository;
pub mod transaction_repository;
pub mod user_repository;

pub use budget_limit_repository::SeaOrmBudgetLimitRepository;
pub use budget_repository::SeaOrmBudgetRepository;
pub use category_repository::SeaOrmCategoryRepository;
pub use family_repository::SeaOrmFamilyRepository;
pub use goal_repository::SeaOrmGoalRepository;
pub use notification_repository::SeaOrmNotificationRepository;
pub use regular_payment_repository::SeaOrmRegularPaymentRepository;
pub use transaction_repository::SeaOrmTransactionRepository;
pub use user_repository::SeaOrmUserRepository;
