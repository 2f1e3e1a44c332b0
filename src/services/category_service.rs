//! Category Service - income and expense categories of a budget

use super::access::budget_for_member;
use crate::domain::inputs::CategoryInput;
use crate::domain::{CategoryType, DomainError, FamilyRole};
use crate::infrastructure::AppState;
use crate::models::{CategoryDto, category};

fn ensure_manager(role: FamilyRole) -> Result<(), DomainError> {
    if !role.can_manage() {
        return Err(DomainError::forbidden(
            "Only the family owner or an admin can manage categories",
        ));
    }
    Ok(())
}

/// Category plus the caller's role in the owning family
async fn category_for_member(
    state: &AppState,
    category_id: i32,
    user_id: i32,
) -> Result<(category::Model, FamilyRole), DomainError> {
    let category = state
        .categories
        .find_by_id(category_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Category"))?;
    let (_, role) = budget_for_member(state, category.budget_id, user_id).await?;
    Ok((category, role))
}

async fn ensure_unique_name(
    state: &AppState,
    budget_id: i32,
    name: &str,
    except: Option<i32>,
) -> Result<(), DomainError> {
    if let Some(existing) = state.categories.find_by_name(budget_id, name).await? {
        if Some(existing.id) != except {
            return Err(DomainError::conflict(format!(
                "A category named '{}' already exists in this budget",
                existing.name
            )));
        }
    }
    Ok(())
}

pub async fn create_category(
    state: &AppState,
    user_id: i32,
    input: CategoryInput,
) -> Result<CategoryDto, DomainError> {
    let input = input.validate()?;
    let (_, role) = budget_for_member(state, input.budget_id, user_id).await?;
    ensure_manager(role)?;
    ensure_unique_name(state, input.budget_id, &input.name, None).await?;

    let category = state.categories.create(input).await?;
    Ok(CategoryDto::from(category))
}

pub async fn get_category(
    state: &AppState,
    category_id: i32,
    user_id: i32,
) -> Result<CategoryDto, DomainError> {
    let (category, _) = category_for_member(state, category_id, user_id).await?;
    Ok(CategoryDto::from(category))
}

pub async fn list_categories(
    state: &AppState,
    budget_id: i32,
    user_id: i32,
    category_type: Option<&str>,
) -> Result<Vec<CategoryDto>, DomainError> {
    budget_for_member(state, budget_id, user_id).await?;
    let kind = match category_type.filter(|t| !t.trim().is_empty()) {
        Some(t) => Some(t.parse::<CategoryType>()?),
        None => None,
    };

    let categories = state.categories.list_by_budget(budget_id, kind).await?;
    Ok(categories.into_iter().map(CategoryDto::from).collect())
}

pub async fn update_category(
    state: &AppState,
    category_id: i32,
    user_id: i32,
    input: CategoryInput,
) -> Result<CategoryDto, DomainError> {
    let input = input.validate()?;
    let (category, role) = category_for_member(state, category_id, user_id).await?;
    ensure_manager(role)?;
    ensure_unique_name(state, category.budget_id, &input.name, Some(category.id)).await?;

    let becomes_income = input.category_type == CategoryType::Income.as_str();
    if becomes_income && category.category_type == CategoryType::Expense.as_str() {
        let has_limits = state
            .limits
            .list_by_budget(category.budget_id)
            .await?
            .iter()
            .any(|(limit, _)| limit.category_id == category.id);
        if has_limits {
            return Err(DomainError::conflict(
                "Remove the category's limits before turning it into an income category",
            ));
        }
    }

    let updated = state.categories.update(category.id, input).await?;
    Ok(CategoryDto::from(updated))
}

pub async fn delete_category(
    state: &AppState,
    category_id: i32,
    user_id: i32,
) -> Result<(), DomainError> {
    let (category, role) = category_for_member(state, category_id, user_id).await?;
    ensure_manager(role)?;
    state.categories.delete(category.id).await
}
