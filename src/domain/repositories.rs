//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use super::inputs::{BudgetInput, BudgetLimitInput, CategoryInput, GoalInput, RegularPaymentInput};
use super::types::{CategoryType, FamilyRole, GoalStatus, NotificationType};
use crate::models::{
    FamilyMemberDto, budget, budget_limit, category, family, financial_goal, notification,
    regular_payment, transaction, user,
};

/// Data for a new user row; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
}

/// Repository trait for User entity
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, DomainError>;

    /// Match on username or email
    async fn find_by_login(&self, login: &str) -> Result<Option<user::Model>, DomainError>;

    async fn username_taken(&self, username: &str) -> Result<bool, DomainError>;

    async fn email_taken(&self, email: &str) -> Result<bool, DomainError>;

    async fn create(&self, user: NewUser) -> Result<user::Model, DomainError>;
}

/// Repository trait for Family entity and its memberships
#[async_trait]
pub trait FamilyRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<family::Model>, DomainError>;

    async fn find_by_join_code(&self, code: &str) -> Result<Option<family::Model>, DomainError>;

    async fn join_code_exists(&self, code: &str) -> Result<bool, DomainError>;

    /// Families the user belongs to, with the user's role in each
    async fn find_for_user(&self, user_id: i32) -> Result<Vec<(family::Model, String)>, DomainError>;

    /// Create the family and register the creator as owner atomically
    async fn create(
        &self,
        name: String,
        join_code: String,
        owner_id: i32,
    ) -> Result<family::Model, DomainError>;

    async fn rename(&self, id: i32, name: String) -> Result<family::Model, DomainError>;

    async fn set_join_code(&self, id: i32, code: String) -> Result<family::Model, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn find_role(&self, family_id: i32, user_id: i32)
    -> Result<Option<FamilyRole>, DomainError>;

    async fn list_members(&self, family_id: i32) -> Result<Vec<FamilyMemberDto>, DomainError>;

    async fn member_ids(&self, family_id: i32) -> Result<Vec<i32>, DomainError>;

    async fn add_member(
        &self,
        family_id: i32,
        user_id: i32,
        role: FamilyRole,
    ) -> Result<(), DomainError>;

    async fn set_role(&self, family_id: i32, user_id: i32, role: FamilyRole)
    -> Result<(), DomainError>;

    async fn remove_member(&self, family_id: i32, user_id: i32) -> Result<(), DomainError>;
}

/// Repository trait for Budget entity
#[async_trait]
pub trait BudgetRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<budget::Model>, DomainError>;

    async fn list_by_family(&self, family_id: i32) -> Result<Vec<budget::Model>, DomainError>;

    async fn create(&self, input: BudgetInput, created_by: i32) -> Result<budget::Model, DomainError>;

    async fn update(&self, id: i32, input: BudgetInput) -> Result<budget::Model, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for Category entity
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<category::Model>, DomainError>;

    async fn list_by_budget(
        &self,
        budget_id: i32,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<category::Model>, DomainError>;

    /// Case-insensitive name lookup within one budget
    async fn find_by_name(
        &self,
        budget_id: i32,
        name: &str,
    ) -> Result<Option<category::Model>, DomainError>;

    async fn create(&self, input: CategoryInput) -> Result<category::Model, DomainError>;

    async fn update(&self, id: i32, input: CategoryInput) -> Result<category::Model, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Filter criteria for transaction queries
#[derive(Debug, Default, Clone)]
pub struct TransactionFilter {
    pub budget_id: i32,
    /// Inclusive lower bound, `YYYY-MM-DD`
    pub from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`
    pub to: Option<String>,
    pub category_id: Option<i32>,
    pub category_type: Option<CategoryType>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub budget_id: i32,
    pub category_id: i32,
    pub amount: f64,
    pub transaction_date: String,
    pub description: Option<String>,
    pub created_by: i32,
    pub regular_payment_id: Option<i32>,
}

/// Repository trait for Transaction entity
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<Option<(transaction::Model, category::Model)>, DomainError>;

    /// Matching transactions with their category, newest date first
    async fn list(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<(transaction::Model, category::Model)>, DomainError>;

    async fn create(&self, tx: NewTransaction) -> Result<transaction::Model, DomainError>;

    async fn update(
        &self,
        id: i32,
        category_id: i32,
        amount: f64,
        transaction_date: String,
        description: Option<String>,
    ) -> Result<transaction::Model, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    /// Sum of a category's amounts dated within [start, end]
    async fn sum_for_category(
        &self,
        category_id: i32,
        start: &str,
        end: &str,
    ) -> Result<f64, DomainError>;
}

/// Repository trait for BudgetLimit entity
#[async_trait]
pub trait BudgetLimitRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<budget_limit::Model>, DomainError>;

    /// Limits of every category in the budget, with the category
    async fn list_by_budget(
        &self,
        budget_id: i32,
    ) -> Result<Vec<(budget_limit::Model, category::Model)>, DomainError>;

    /// Limits of a category whose range contains `date`
    async fn list_covering(
        &self,
        category_id: i32,
        date: &str,
    ) -> Result<Vec<budget_limit::Model>, DomainError>;

    async fn create(&self, input: BudgetLimitInput) -> Result<budget_limit::Model, DomainError>;

    async fn update(
        &self,
        id: i32,
        input: BudgetLimitInput,
    ) -> Result<budget_limit::Model, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for FinancialGoal entity
#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<financial_goal::Model>, DomainError>;

    async fn list_by_family(
        &self,
        family_id: i32,
        status: Option<GoalStatus>,
    ) -> Result<Vec<financial_goal::Model>, DomainError>;

    async fn create(
        &self,
        input: GoalInput,
        created_by: i32,
    ) -> Result<financial_goal::Model, DomainError>;

    async fn update(&self, id: i32, input: GoalInput) -> Result<financial_goal::Model, DomainError>;

    async fn set_progress(
        &self,
        id: i32,
        current_amount: f64,
        status: GoalStatus,
    ) -> Result<financial_goal::Model, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for RegularPayment entity
#[async_trait]
pub trait RegularPaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<regular_payment::Model>, DomainError>;

    async fn list_by_budget(&self, budget_id: i32)
    -> Result<Vec<regular_payment::Model>, DomainError>;

    /// Active templates whose next date is on or before `today`
    async fn list_due(&self, today: &str) -> Result<Vec<regular_payment::Model>, DomainError>;

    async fn create(
        &self,
        input: RegularPaymentInput,
        created_by: i32,
    ) -> Result<regular_payment::Model, DomainError>;

    async fn update(
        &self,
        id: i32,
        input: RegularPaymentInput,
    ) -> Result<regular_payment::Model, DomainError>;

    /// Move the schedule only if it still reads `expected_next` / `expected_active`.
    /// `false` means another writer moved it first.
    async fn advance_if(
        &self,
        id: i32,
        expected_next: &str,
        expected_active: bool,
        next_payment_date: String,
        is_active: bool,
    ) -> Result<bool, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i32,
    pub family_id: Option<i32>,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
}

/// Repository trait for Notification entity
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: NewNotification)
    -> Result<notification::Model, DomainError>;

    /// Newest first
    async fn list_for_user(
        &self,
        user_id: i32,
        unread_only: bool,
    ) -> Result<Vec<notification::Model>, DomainError>;

    async fn count_unread(&self, user_id: i32) -> Result<u64, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<notification::Model>, DomainError>;

    async fn mark_read(&self, id: i32) -> Result<notification::Model, DomainError>;

    /// Returns how many were flipped
    async fn mark_all_read(&self, user_id: i32) -> Result<u64, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
