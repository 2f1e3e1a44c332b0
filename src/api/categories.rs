use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::DomainError;
use crate::domain::inputs::CategoryInput;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::category_service;

#[derive(Debug, Deserialize)]
pub struct CategoriesQuery {
    #[serde(alias = "type")]
    pub category_type: Option<String>,
}

pub async fn list_categories(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<i32>,
    Query(params): Query<CategoriesQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let categories = category_service::list_categories(
        &state,
        budget_id,
        claims.user_id(),
        params.category_type.as_deref(),
    )
    .await?;
    Ok(Json(json!({ "categories": categories, "total": categories.len() })))
}

pub async fn create_category(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<CategoryInput>,
) -> Result<impl IntoResponse, DomainError> {
    let category = category_service::create_category(&state, claims.user_id(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "category": category, "message": "Category created" })),
    ))
}

pub async fn get_category(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let category = category_service::get_category(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "category": category })))
}

pub async fn update_category(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryInput>,
) -> Result<impl IntoResponse, DomainError> {
    let category =
        category_service::update_category(&state, id, claims.user_id(), payload).await?;
    Ok(Json(json!({ "category": category, "message": "Category updated" })))
}

pub async fn delete_category(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    category_service::delete_category(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "message": "Category deleted" })))
}
