use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::notification_service;

#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    #[serde(default)]
    pub unread_only: bool,
}

pub async fn list_notifications(
    State(state): State<AppState>,
    claims: Claims,
    Query(params): Query<NotificationsQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let notifications =
        notification_service::list_notifications(&state, claims.user_id(), params.unread_only)
            .await?;
    Ok(Json(json!({ "notifications": notifications, "total": notifications.len() })))
}

pub async fn unread_count(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, DomainError> {
    let count = notification_service::unread_count(&state, claims.user_id()).await?;
    Ok(Json(json!({ "unread": count })))
}

pub async fn mark_read(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let notification = notification_service::mark_read(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "notification": notification, "message": "Marked as read" })))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, DomainError> {
    let updated = notification_service::mark_all_read(&state, claims.user_id()).await?;
    Ok(Json(json!({ "updated": updated, "message": "All notifications marked as read" })))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    notification_service::delete_notification(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "message": "Notification deleted" })))
}
