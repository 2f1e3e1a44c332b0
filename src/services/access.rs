//! Membership checks shared by every family-scoped service

use crate::domain::{DomainError, FamilyRole};
use crate::infrastructure::AppState;
use crate::models::{budget, category};

/// Role of `user_id` in the family, or 403 when not a member
pub async fn require_member(
    state: &AppState,
    family_id: i32,
    user_id: i32,
) -> Result<FamilyRole, DomainError> {
    state
        .families
        .find_role(family_id, user_id)
        .await?
        .ok_or_else(|| DomainError::forbidden("You are not a member of this family"))
}

/// Same as `require_member`, but only owners and admins pass
pub async fn require_manager(
    state: &AppState,
    family_id: i32,
    user_id: i32,
) -> Result<FamilyRole, DomainError> {
    let role = require_member(state, family_id, user_id).await?;
    if !role.can_manage() {
        return Err(DomainError::forbidden(
            "Only the family owner or an admin can do this",
        ));
    }
    Ok(role)
}

/// Load a budget the user can see, with their role in its family
pub async fn budget_for_member(
    state: &AppState,
    budget_id: i32,
    user_id: i32,
) -> Result<(budget::Model, FamilyRole), DomainError> {
    let budget = state
        .budgets
        .find_by_id(budget_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Budget"))?;
    let role = require_member(state, budget.family_id, user_id).await?;
    Ok((budget, role))
}

/// Load a category that must belong to `budget_id`
pub async fn category_in_budget(
    state: &AppState,
    category_id: i32,
    budget_id: i32,
) -> Result<category::Model, DomainError> {
    let category = state
        .categories
        .find_by_id(category_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Category"))?;
    if category.budget_id != budget_id {
        return Err(DomainError::validation(
            "category_id: category does not belong to this budget",
        ));
    }
    Ok(category)
}
