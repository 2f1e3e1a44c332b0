use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::domain::DomainError;
use crate::domain::inputs::{FamilyNameInput, JoinFamilyInput, UpdateMemberRoleInput};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::family_service;

pub async fn list_families(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, DomainError> {
    let families = family_service::list_families(&state, claims.user_id()).await?;
    Ok(Json(json!({ "families": families, "total": families.len() })))
}

pub async fn create_family(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<FamilyNameInput>,
) -> Result<impl IntoResponse, DomainError> {
    let family = family_service::create_family(&state, claims.user_id(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "family": family, "message": "Family created" })),
    ))
}

pub async fn get_family(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let family = family_service::get_family(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "family": family })))
}

pub async fn update_family(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<FamilyNameInput>,
) -> Result<impl IntoResponse, DomainError> {
    let family = family_service::update_family(&state, id, claims.user_id(), payload).await?;
    Ok(Json(json!({ "family": family, "message": "Family updated" })))
}

pub async fn delete_family(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    family_service::delete_family(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "message": "Family deleted" })))
}

pub async fn join_family(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<JoinFamilyInput>,
) -> Result<impl IntoResponse, DomainError> {
    let family = family_service::join_family(&state, claims.user_id(), payload).await?;
    Ok(Json(json!({ "family": family, "message": "Joined family" })))
}

pub async fn leave_family(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    family_service::leave_family(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "message": "Left family" })))
}

pub async fn regenerate_join_code(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let family = family_service::regenerate_join_code(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "family": family, "message": "Join code regenerated" })))
}

pub async fn update_member_role(
    State(state): State<AppState>,
    claims: Claims,
    Path((id, member_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateMemberRoleInput>,
) -> Result<impl IntoResponse, DomainError> {
    let family =
        family_service::update_member_role(&state, id, claims.user_id(), member_id, payload)
            .await?;
    Ok(Json(json!({ "family": family, "message": "Member role updated" })))
}

pub async fn remove_member(
    State(state): State<AppState>,
    claims: Claims,
    Path((id, member_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, DomainError> {
    family_service::remove_member(&state, id, claims.user_id(), member_id).await?;
    Ok(Json(json!({ "message": "Member removed" })))
}
