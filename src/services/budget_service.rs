//! Budget Service - CRUD for family budgets

use super::access::{budget_for_member, require_manager, require_member};
use crate::domain::DomainError;
use crate::domain::inputs::BudgetInput;
use crate::infrastructure::AppState;
use crate::models::BudgetDto;

pub async fn create_budget(
    state: &AppState,
    user_id: i32,
    input: BudgetInput,
) -> Result<BudgetDto, DomainError> {
    let input = input.validate()?;
    require_manager(state, input.family_id, user_id).await?;

    let budget = state.budgets.create(input, user_id).await?;
    tracing::info!("Budget #{} '{}' created in family #{}", budget.id, budget.name, budget.family_id);
    Ok(BudgetDto::from(budget))
}

pub async fn get_budget(
    state: &AppState,
    budget_id: i32,
    user_id: i32,
) -> Result<BudgetDto, DomainError> {
    let (budget, _) = budget_for_member(state, budget_id, user_id).await?;
    Ok(BudgetDto::from(budget))
}

pub async fn list_budgets(
    state: &AppState,
    family_id: i32,
    user_id: i32,
) -> Result<Vec<BudgetDto>, DomainError> {
    require_member(state, family_id, user_id).await?;
    let budgets = state.budgets.list_by_family(family_id).await?;
    Ok(budgets.into_iter().map(BudgetDto::from).collect())
}

pub async fn update_budget(
    state: &AppState,
    budget_id: i32,
    user_id: i32,
    input: BudgetInput,
) -> Result<BudgetDto, DomainError> {
    let input = input.validate()?;
    let (budget, role) = budget_for_member(state, budget_id, user_id).await?;
    if !role.can_manage() {
        return Err(DomainError::forbidden("Only the family owner or an admin can edit budgets"));
    }

    let updated = state.budgets.update(budget.id, input).await?;
    Ok(BudgetDto::from(updated))
}

pub async fn delete_budget(
    state: &AppState,
    budget_id: i32,
    user_id: i32,
) -> Result<(), DomainError> {
    let (budget, role) = budget_for_member(state, budget_id, user_id).await?;
    if !role.can_manage() {
        return Err(DomainError::forbidden("Only the family owner or an admin can delete budgets"));
    }

    state.budgets.delete(budget.id).await?;
    tracing::info!("Budget #{} deleted by user #{}", budget.id, user_id);
    Ok(())
}
