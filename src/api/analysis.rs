use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::Datelike;
use serde::Deserialize;
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::{TransactionQuery, analysis_service};

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub year: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/budgets/{id}/summary",
    params(("id" = i32, Path, description = "Budget id")),
    responses(
        (status = 200, description = "Income, expense and balance over the range"),
        (status = 400, description = "Malformed or inverted date range"),
        (status = 404, description = "Budget not found")
    ),
    security(("bearer" = []))
)]
pub async fn summary(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<i32>,
    Query(params): Query<TransactionQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let summary = analysis_service::summary(&state, budget_id, claims.user_id(), params).await?;
    Ok(Json(json!({ "summary": summary })))
}

pub async fn category_breakdown(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<i32>,
    Query(params): Query<TransactionQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let categories =
        analysis_service::category_breakdown(&state, budget_id, claims.user_id(), params).await?;
    Ok(Json(json!({ "categories": categories, "total": categories.len() })))
}

pub async fn monthly_trend(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<i32>,
    Query(params): Query<MonthlyQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let year = params
        .year
        .unwrap_or_else(|| chrono::Local::now().year());
    let months =
        analysis_service::monthly_trend(&state, budget_id, claims.user_id(), year).await?;
    Ok(Json(json!({ "year": year, "months": months })))
}
