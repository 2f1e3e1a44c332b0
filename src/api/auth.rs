use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::domain::DomainError;
use crate::domain::inputs::{LoginInput, RegisterInput};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::auth_service;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    responses(
        (status = 201, description = "Account created, token issued"),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Username or email already in use")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterInput>,
) -> Result<impl IntoResponse, DomainError> {
    let session = auth_service::register(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "token": session.token,
            "user": session.user,
            "message": "Account created"
        })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 200, description = "Token issued"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginInput>,
) -> Result<impl IntoResponse, DomainError> {
    let session = auth_service::login(&state, payload).await?;
    Ok(Json(json!({ "token": session.token, "user": session.user })))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, DomainError> {
    let user = auth_service::current_user(&state, claims.user_id()).await?;
    Ok(Json(json!({ "user": user })))
}
