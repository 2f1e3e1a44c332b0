//! Services Layer
//!
//! Business rules extracted from HTTP handlers. Every function takes the
//! shared `AppState` plus the calling user and returns `DomainError` on
//! failure, so handlers, the scheduler and tests all go through the same path.

pub mod access;
pub mod analysis_service;
pub mod auth_service;
pub mod budget_limit_service;
pub mod budget_service;
pub mod category_service;
pub mod family_service;
pub mod goal_service;
pub mod notification_service;
pub mod regular_payment_service;
pub mod transaction_service;

pub use transaction_service::TransactionQuery;
