//! Financial Goal Service - family savings targets

use chrono::NaiveDate;

use super::access::require_member;
use super::notification_service::notify_family;
use crate::domain::inputs::{ContributionInput, GoalInput};
use crate::domain::validation::{date, round2};
use crate::domain::{DomainError, FamilyRole, GoalStatus, NotificationType};
use crate::infrastructure::AppState;
use crate::models::{FinancialGoalDto, financial_goal};

/// Progress figures derived from a goal's amounts and deadline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    pub percent_complete: f64,
    pub days_remaining: i64,
    pub is_overdue: bool,
}

pub fn progress(
    current: f64,
    target: f64,
    deadline: NaiveDate,
    today: NaiveDate,
    status: GoalStatus,
) -> GoalProgress {
    let percent_complete = if target > 0.0 {
        round2((current / target * 100.0).min(100.0))
    } else {
        0.0
    };
    let days = (deadline - today).num_days();

    GoalProgress {
        percent_complete,
        days_remaining: days.max(0),
        is_overdue: days < 0 && status == GoalStatus::Active,
    }
}

fn to_dto(goal: financial_goal::Model) -> FinancialGoalDto {
    let today = chrono::Local::now().date_naive();
    let status = goal.status.parse().unwrap_or(GoalStatus::Active);
    let p = match date("deadline", &goal.deadline) {
        Ok(deadline) => progress(goal.current_amount, goal.target_amount, deadline, today, status),
        Err(_) => {
            tracing::warn!("Goal #{} has an unreadable deadline '{}'", goal.id, goal.deadline);
            GoalProgress {
                percent_complete: 0.0,
                days_remaining: 0,
                is_overdue: false,
            }
        }
    };

    FinancialGoalDto {
        id: goal.id,
        family_id: goal.family_id,
        name: goal.name,
        description: goal.description,
        target_amount: goal.target_amount,
        current_amount: goal.current_amount,
        deadline: goal.deadline,
        status: goal.status,
        percent_complete: p.percent_complete,
        days_remaining: p.days_remaining,
        is_overdue: p.is_overdue,
        created_by: goal.created_by,
    }
}

async fn goal_for_member(
    state: &AppState,
    goal_id: i32,
    user_id: i32,
) -> Result<(financial_goal::Model, FamilyRole), DomainError> {
    let goal = state
        .goals
        .find_by_id(goal_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Goal"))?;
    let role = require_member(state, goal.family_id, user_id).await?;
    Ok((goal, role))
}

async fn announce_completion(state: &AppState, goal: &financial_goal::Model) {
    let message = format!(
        "The goal '{}' reached its target of {:.2}",
        goal.name, goal.target_amount
    );
    if let Err(e) = notify_family(
        state,
        goal.family_id,
        None,
        NotificationType::GoalCompleted,
        "Financial goal completed",
        &message,
    )
    .await
    {
        tracing::error!("Failed to announce completion of goal #{}: {}", goal.id, e);
    }
}

pub async fn create_goal(
    state: &AppState,
    user_id: i32,
    input: GoalInput,
) -> Result<FinancialGoalDto, DomainError> {
    let mut input = input.validate()?;
    require_member(state, input.family_id, user_id).await?;
    let already_reached = input.current_amount >= input.target_amount;
    input.status = Some(if already_reached {
        GoalStatus::Completed.as_str().to_string()
    } else {
        GoalStatus::Active.as_str().to_string()
    });

    let goal = state.goals.create(input, user_id).await?;
    tracing::info!("Goal #{} '{}' created in family #{}", goal.id, goal.name, goal.family_id);
    if already_reached {
        announce_completion(state, &goal).await;
    }
    Ok(to_dto(goal))
}

pub async fn get_goal(
    state: &AppState,
    goal_id: i32,
    user_id: i32,
) -> Result<FinancialGoalDto, DomainError> {
    let (goal, _) = goal_for_member(state, goal_id, user_id).await?;
    Ok(to_dto(goal))
}

pub async fn list_goals(
    state: &AppState,
    family_id: i32,
    user_id: i32,
    status: Option<&str>,
) -> Result<Vec<FinancialGoalDto>, DomainError> {
    require_member(state, family_id, user_id).await?;
    let status = match status.filter(|s| !s.trim().is_empty()) {
        Some(s) => Some(s.parse::<GoalStatus>()?),
        None => None,
    };

    let goals = state.goals.list_by_family(family_id, status).await?;
    Ok(goals.into_iter().map(to_dto).collect())
}

/// Creator or a family manager may edit; `family_id` in the payload is ignored
pub async fn update_goal(
    state: &AppState,
    goal_id: i32,
    user_id: i32,
    input: GoalInput,
) -> Result<FinancialGoalDto, DomainError> {
    let mut input = input.validate()?;
    let (goal, role) = goal_for_member(state, goal_id, user_id).await?;
    if goal.created_by != user_id && !role.can_manage() {
        return Err(DomainError::forbidden(
            "Only the goal's creator or a family manager can edit it",
        ));
    }

    let was_active = goal.status == GoalStatus::Active.as_str();
    let stays_active = input
        .status
        .as_deref()
        .map_or(was_active, |s| s == GoalStatus::Active.as_str());
    let reaches_target = stays_active && input.current_amount >= input.target_amount;
    if reaches_target {
        input.status = Some(GoalStatus::Completed.as_str().to_string());
    }

    let updated = state.goals.update(goal.id, input).await?;
    if reaches_target {
        announce_completion(state, &updated).await;
    }
    Ok(to_dto(updated))
}

pub async fn delete_goal(
    state: &AppState,
    goal_id: i32,
    user_id: i32,
) -> Result<(), DomainError> {
    let (goal, role) = goal_for_member(state, goal_id, user_id).await?;
    if goal.created_by != user_id && !role.can_manage() {
        return Err(DomainError::forbidden(
            "Only the goal's creator or a family manager can delete it",
        ));
    }
    state.goals.delete(goal.id).await
}

/// Add money to an active goal; reaching the target completes it
pub async fn contribute(
    state: &AppState,
    goal_id: i32,
    user_id: i32,
    input: ContributionInput,
) -> Result<FinancialGoalDto, DomainError> {
    let input = input.validate()?;
    let (goal, _) = goal_for_member(state, goal_id, user_id).await?;
    if goal.status != GoalStatus::Active.as_str() {
        return Err(DomainError::conflict(format!(
            "Goal is {}, contributions are closed",
            goal.status
        )));
    }

    let current = round2(goal.current_amount + input.amount);
    let completed = current >= goal.target_amount;
    let status = if completed {
        GoalStatus::Completed
    } else {
        GoalStatus::Active
    };

    let updated = state.goals.set_progress(goal.id, current, status).await?;
    tracing::info!(
        "User #{} contributed {:.2} to goal #{} ({:.2}/{:.2})",
        user_id,
        input.amount,
        goal.id,
        current,
        goal.target_amount
    );
    if completed {
        announce_completion(state, &updated).await;
    }
    Ok(to_dto(updated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn percent_is_capped_at_one_hundred() {
        let p = progress(1500.0, 1000.0, day(2025, 1, 1), day(2024, 1, 1), GoalStatus::Completed);
        assert_eq!(p.percent_complete, 100.0);
    }

    #[test]
    fn percent_is_rounded_to_cents() {
        let p = progress(1.0, 3.0, day(2025, 1, 1), day(2024, 1, 1), GoalStatus::Active);
        assert_eq!(p.percent_complete, 33.33);
    }

    #[test]
    fn days_remaining_counts_to_deadline() {
        let p = progress(0.0, 100.0, day(2024, 3, 1), day(2024, 2, 1), GoalStatus::Active);
        assert_eq!(p.days_remaining, 29);
        assert!(!p.is_overdue);
    }

    #[test]
    fn past_deadline_is_overdue_only_while_active() {
        let active = progress(10.0, 100.0, day(2024, 1, 1), day(2024, 1, 11), GoalStatus::Active);
        assert_eq!(active.days_remaining, 0);
        assert!(active.is_overdue);

        let cancelled =
            progress(10.0, 100.0, day(2024, 1, 1), day(2024, 1, 11), GoalStatus::Cancelled);
        assert!(!cancelled.is_overdue);
    }
}
