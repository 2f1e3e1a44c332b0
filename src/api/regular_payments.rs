use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::domain::DomainError;
use crate::domain::inputs::RegularPaymentInput;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::regular_payment_service;

pub async fn list_regular_payments(
    State(state): State<AppState>,
    claims: Claims,
    Path(budget_id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let payments =
        regular_payment_service::list_regular_payments(&state, budget_id, claims.user_id())
            .await?;
    Ok(Json(json!({ "regular_payments": payments, "total": payments.len() })))
}

pub async fn create_regular_payment(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<RegularPaymentInput>,
) -> Result<impl IntoResponse, DomainError> {
    let payment =
        regular_payment_service::create_regular_payment(&state, claims.user_id(), payload)
            .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "regular_payment": payment, "message": "Regular payment created" })),
    ))
}

pub async fn get_regular_payment(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let payment =
        regular_payment_service::get_regular_payment(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "regular_payment": payment })))
}

pub async fn update_regular_payment(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<RegularPaymentInput>,
) -> Result<impl IntoResponse, DomainError> {
    let payment =
        regular_payment_service::update_regular_payment(&state, id, claims.user_id(), payload)
            .await?;
    Ok(Json(json!({ "regular_payment": payment, "message": "Regular payment updated" })))
}

pub async fn delete_regular_payment(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    regular_payment_service::delete_regular_payment(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "message": "Regular payment deleted" })))
}

pub async fn execute_regular_payment(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let transaction =
        regular_payment_service::execute_regular_payment(&state, id, claims.user_id()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "transaction": transaction, "message": "Regular payment executed" })),
    ))
}
