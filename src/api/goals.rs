use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::DomainError;
use crate::domain::inputs::{ContributionInput, GoalInput};
use crate::infrastructure::AppState;
use crate::infrastructure::auth::Claims;
use crate::services::goal_service;

#[derive(Debug, Deserialize)]
pub struct GoalsQuery {
    pub status: Option<String>,
}

pub async fn list_goals(
    State(state): State<AppState>,
    claims: Claims,
    Path(family_id): Path<i32>,
    Query(params): Query<GoalsQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let goals =
        goal_service::list_goals(&state, family_id, claims.user_id(), params.status.as_deref())
            .await?;
    Ok(Json(json!({ "goals": goals, "total": goals.len() })))
}

pub async fn create_goal(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<GoalInput>,
) -> Result<impl IntoResponse, DomainError> {
    let goal = goal_service::create_goal(&state, claims.user_id(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "goal": goal, "message": "Goal created" })),
    ))
}

pub async fn get_goal(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    let goal = goal_service::get_goal(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "goal": goal })))
}

pub async fn update_goal(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<GoalInput>,
) -> Result<impl IntoResponse, DomainError> {
    let goal = goal_service::update_goal(&state, id, claims.user_id(), payload).await?;
    Ok(Json(json!({ "goal": goal, "message": "Goal updated" })))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, DomainError> {
    goal_service::delete_goal(&state, id, claims.user_id()).await?;
    Ok(Json(json!({ "message": "Goal deleted" })))
}

pub async fn contribute(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<ContributionInput>,
) -> Result<impl IntoResponse, DomainError> {
    let goal = goal_service::contribute(&state, id, claims.user_id(), payload).await?;
    let message = if goal.status == "completed" {
        "Contribution added, goal completed"
    } else {
        "Contribution added"
    };
    Ok(Json(json!({ "goal": goal, "message": message })))
}
