//! Budget Limit Service - spending caps per expense category

use super::access::budget_for_member;
use crate::domain::inputs::BudgetLimitInput;
use crate::domain::validation::round2;
use crate::domain::{CategoryType, DomainError, FamilyRole};
use crate::infrastructure::AppState;
use crate::models::{BudgetLimitDto, budget_limit, category};

/// `(remaining, percent_used, is_exceeded)` for a cap and the amount spent
pub fn usage(amount: f64, spent: f64) -> (f64, f64, bool) {
    let percent = if amount > 0.0 {
        round2(spent / amount * 100.0)
    } else {
        0.0
    };
    (round2(amount - spent), percent, spent > amount)
}

async fn to_dto(
    state: &AppState,
    limit: budget_limit::Model,
    category: &category::Model,
) -> Result<BudgetLimitDto, DomainError> {
    let spent = state
        .transactions
        .sum_for_category(category.id, &limit.start_date, &limit.end_date)
        .await?;
    let (remaining, percent_used, is_exceeded) = usage(limit.amount, spent);

    Ok(BudgetLimitDto {
        id: limit.id,
        category_id: category.id,
        category_name: category.name.clone(),
        budget_id: category.budget_id,
        amount: limit.amount,
        start_date: limit.start_date,
        end_date: limit.end_date,
        spent: round2(spent),
        remaining,
        percent_used,
        is_exceeded,
    })
}

async fn load_category(state: &AppState, category_id: i32) -> Result<category::Model, DomainError> {
    state
        .categories
        .find_by_id(category_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Category"))
}

/// Limit with its category and the caller's family role
async fn limit_for_member(
    state: &AppState,
    limit_id: i32,
    user_id: i32,
) -> Result<(budget_limit::Model, category::Model, FamilyRole), DomainError> {
    let limit = state
        .limits
        .find_by_id(limit_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Budget limit"))?;
    let category = load_category(state, limit.category_id).await?;
    let (_, role) = budget_for_member(state, category.budget_id, user_id).await?;
    Ok((limit, category, role))
}

fn ensure_manager(role: FamilyRole) -> Result<(), DomainError> {
    if !role.can_manage() {
        return Err(DomainError::forbidden(
            "Only the family owner or an admin can manage limits",
        ));
    }
    Ok(())
}

pub async fn create_limit(
    state: &AppState,
    user_id: i32,
    input: BudgetLimitInput,
) -> Result<BudgetLimitDto, DomainError> {
    let input = input.validate()?;
    let category = load_category(state, input.category_id).await?;
    let (_, role) = budget_for_member(state, category.budget_id, user_id).await?;
    ensure_manager(role)?;
    if category.category_type != CategoryType::Expense.as_str() {
        return Err(DomainError::validation(
            "category_id: limits can only be set on expense categories",
        ));
    }

    let limit = state.limits.create(input).await?;
    tracing::info!("Limit #{} set on category #{}", limit.id, category.id);
    to_dto(state, limit, &category).await
}

pub async fn get_limit(
    state: &AppState,
    limit_id: i32,
    user_id: i32,
) -> Result<BudgetLimitDto, DomainError> {
    let (limit, category, _) = limit_for_member(state, limit_id, user_id).await?;
    to_dto(state, limit, &category).await
}

pub async fn list_limits(
    state: &AppState,
    budget_id: i32,
    user_id: i32,
) -> Result<Vec<BudgetLimitDto>, DomainError> {
    budget_for_member(state, budget_id, user_id).await?;

    let mut dtos = Vec::new();
    for (limit, category) in state.limits.list_by_budget(budget_id).await? {
        dtos.push(to_dto(state, limit, &category).await?);
    }
    Ok(dtos)
}

/// The category of a limit is fixed; `category_id` in the payload is ignored
pub async fn update_limit(
    state: &AppState,
    limit_id: i32,
    user_id: i32,
    input: BudgetLimitInput,
) -> Result<BudgetLimitDto, DomainError> {
    let input = input.validate()?;
    let (limit, category, role) = limit_for_member(state, limit_id, user_id).await?;
    ensure_manager(role)?;

    let updated = state.limits.update(limit.id, input).await?;
    to_dto(state, updated, &category).await
}

pub async fn delete_limit(
    state: &AppState,
    limit_id: i32,
    user_id: i32,
) -> Result<(), DomainError> {
    let (limit, _, role) = limit_for_member(state, limit_id, user_id).await?;
    ensure_manager(role)?;
    state.limits.delete(limit.id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_reports_percentage_and_remaining() {
        assert_eq!(usage(300.0, 75.0), (225.0, 25.0, false));
        assert_eq!(usage(300.0, 100.0), (200.0, 33.33, false));
    }

    #[test]
    fn overspending_goes_negative() {
        let (remaining, percent, exceeded) = usage(200.0, 250.0);
        assert_eq!(remaining, -50.0);
        assert_eq!(percent, 125.0);
        assert!(exceeded);
    }

    #[test]
    fn spending_exactly_the_cap_is_not_exceeded() {
        assert_eq!(usage(50.0, 50.0), (0.0, 100.0, false));
    }
}
