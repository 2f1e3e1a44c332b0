pub mod budget;
pub mod budget_limit;
pub mod category;
pub mod family;
pub mod family_member;
pub mod financial_goal;
pub mod notification;
pub mod regular_payment;
pub mod transaction;
pub mod user;

pub use budget::BudgetDto;
pub use budget_limit::BudgetLimitDto;
pub use category::CategoryDto;
pub use family::{FamilyDto, FamilyMemberDto};
pub use financial_goal::FinancialGoalDto;
pub use regular_payment::RegularPaymentDto;
pub use transaction::TransactionDto;
pub use user::UserDto;
