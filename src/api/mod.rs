pub mod analysis;
pub mod auth;
pub mod budgets;
pub mod categories;
pub mod error;
pub mod families;
pub mod goals;
pub mod health;
pub mod limits;
pub mod notifications;
pub mod regular_payments;
pub mod transactions;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Families and membership
        .route(
            "/families",
            get(families::list_families).post(families::create_family),
        )
        .route("/families/join", post(families::join_family))
        .route(
            "/families/:id",
            get(families::get_family)
                .put(families::update_family)
                .delete(families::delete_family),
        )
        .route("/families/:id/leave", post(families::leave_family))
        .route("/families/:id/join-code", post(families::regenerate_join_code))
        .route(
            "/families/:id/members/:user_id",
            put(families::update_member_role).delete(families::remove_member),
        )
        // Budgets
        .route("/families/:id/budgets", get(budgets::list_budgets))
        .route("/budgets", post(budgets::create_budget))
        .route(
            "/budgets/:id",
            get(budgets::get_budget)
                .put(budgets::update_budget)
                .delete(budgets::delete_budget),
        )
        // Categories
        .route("/budgets/:id/categories", get(categories::list_categories))
        .route("/categories", post(categories::create_category))
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Transactions
        .route("/budgets/:id/transactions", get(transactions::list_transactions))
        .route(
            "/budgets/:id/transactions/export",
            get(transactions::export_transactions),
        )
        .route("/transactions", post(transactions::create_transaction))
        .route(
            "/transactions/:id",
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        // Limits
        .route("/budgets/:id/limits", get(limits::list_limits))
        .route("/limits", post(limits::create_limit))
        .route(
            "/limits/:id",
            get(limits::get_limit)
                .put(limits::update_limit)
                .delete(limits::delete_limit),
        )
        // Goals
        .route("/families/:id/goals", get(goals::list_goals))
        .route("/goals", post(goals::create_goal))
        .route(
            "/goals/:id",
            get(goals::get_goal)
                .put(goals::update_goal)
                .delete(goals::delete_goal),
        )
        .route("/goals/:id/contribute", post(goals::contribute))
        // Regular payments
        .route(
            "/budgets/:id/regular-payments",
            get(regular_payments::list_regular_payments),
        )
        .route(
            "/regular-payments",
            post(regular_payments::create_regular_payment),
        )
        .route(
            "/regular-payments/:id",
            get(regular_payments::get_regular_payment)
                .put(regular_payments::update_regular_payment)
                .delete(regular_payments::delete_regular_payment),
        )
        .route(
            "/regular-payments/:id/execute",
            post(regular_payments::execute_regular_payment),
        )
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read-all", put(notifications::mark_all_read))
        .route("/notifications/:id/read", put(notifications::mark_read))
        .route(
            "/notifications/:id",
            axum::routing::delete(notifications::delete_notification),
        )
        // Analysis
        .route("/budgets/:id/summary", get(analysis::summary))
        .route(
            "/budgets/:id/analysis/categories",
            get(analysis::category_breakdown),
        )
        .route("/budgets/:id/analysis/monthly", get(analysis::monthly_trend))
        .with_state(state)
}
