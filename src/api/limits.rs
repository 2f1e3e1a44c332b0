use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::domain::DomainError;
use crate::domain::inputs::BudgetLimitInput;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::budget_limit_service;

pub async fn list_limits(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let limits = budget_limit_service::list_limits(&state, budget_id, claims.user_id()).await?;
    Ok(Json(json!({ "limits": limits, "total": limits.len() })))
}

pub async fn create_limit(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<BudgetLimitInput>,
) -> Result<impl IntoResponse, DomainError> {
    let limit = budget_limit_service::create_limit(&state, claims.user_id(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "limit": limit, "message": "Limit created" })),
    ))
}

pub async fn get_limit(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let limit = budget_limit_service::get_limit(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "limit": limit })))
}

pub async fn update_limit(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<BudgetLimitInput>,
) -> Result<impl IntoResponse, DomainError> {
    let limit = budget_limit_service::update_limit(&state, id, claims.user_id(), payload).await?;
    Ok(Json(json!({ "limit": limit, "message": "Limit updated" })))
}

pub async fn delete_limit(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    budget_limit_service::delete_limit(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "message": "Limit deleted" })))
}
