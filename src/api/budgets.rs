use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::domain::DomainError;
use crate::domain::inputs::BudgetInput;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::budget_service;

pub async fn list_budgets(
    State(state): State<AppState>,
    claims: Claims,
    Path(family_id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let budgets = budget_service::list_budgets(&state, family_id, claims.user_id()).await?;
    Ok(Json(json!({ "budgets": budgets, "total": budgets.len() })))
}

pub async fn create_budget(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<BudgetInput>,
) -> Result<impl IntoResponse, DomainError> {
    let budget = budget_service::create_budget(&state, claims.user_id(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "budget": budget, "message": "Budget created" })),
    ))
}

pub async fn get_budget(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let budget = budget_service::get_budget(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "budget": budget })))
}

pub async fn update_budget(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<BudgetInput>,
) -> Result<impl IntoResponse, DomainError> {
    let budget = budget_service::update_budget(&state, id, claims.user_id(), payload).await?;
    Ok(Json(json!({ "budget": budget, "message": "Budget updated" })))
}

pub async fn delete_budget(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    budget_service::delete_budget(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "message": "Budget deleted" })))
}
