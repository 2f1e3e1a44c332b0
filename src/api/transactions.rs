use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::domain::DomainError;
use crate::domain::inputs::TransactionInput;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::{TransactionQuery, transaction_service};

#[utoipa::path(
    get,
    path = "/api/budgets/{id}/transactions",
    params(("id" = i32, Path, description = "Budget id")),
    responses(
        (status = 200, description = "Transactions, newest first"),
        (status = 403, description = "Not a member of the budget's family"),
        (status = 404, description = "Budget not found")
    ),
    security(("bearer" = []))
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<i32>,
    Query(params): Query<TransactionQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let transactions =
        transaction_service::list_transactions(&state, budget_id, claims.user_id(), params)
            .await?;
    Ok(Json(json!({ "transactions": transactions, "total": transactions.len() })))
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    responses(
        (status = 201, description = "Transaction recorded"),
        (status = 400, description = "Invalid amount, date or category"),
        (status = 403, description = "Not a member of the budget's family")
    ),
    security(("bearer" = []))
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<TransactionInput>,
) -> Result<impl IntoResponse, DomainError> {
    let transaction =
        transaction_service::create_transaction(&state, claims.user_id(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "transaction": transaction, "message": "Transaction created" })),
    ))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let transaction = transaction_service::get_transaction(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "transaction": transaction })))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<TransactionInput>,
) -> Result<impl IntoResponse, DomainError> {
    let transaction =
        transaction_service::update_transaction(&state, id, claims.user_id(), payload).await?;
    Ok(Json(json!({ "transaction": transaction, "message": "Transaction updated" })))
}

pub async fn delete_transaction(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    transaction_service::delete_transaction(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "message": "Transaction deleted" })))
}

/// CSV download of the filtered transactions
pub async fn export_transactions(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<i32>,
    Query(params): Query<TransactionQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let csv =
        transaction_service::export_transactions_csv(&state, budget_id, claims.user_id(), params)
            .await?;
    let disposition = format!("attachment; filename=\"budget_{}_transactions.csv\"", budget_id);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
