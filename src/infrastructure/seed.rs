//! Demo data for local development (`SEED_DEMO`)

use chrono::{Datelike, Duration};

use crate::domain::DomainError;
use crate::domain::inputs::{
    BudgetInput, BudgetLimitInput, CategoryInput, FamilyNameInput, GoalInput, RegisterInput,
    RegularPaymentInput, TransactionInput,
};
use crate::domain::validation::format_date;
use crate::infrastructure::AppState;
use crate::services::{
    auth_service, budget_limit_service, budget_service, category_service, family_service,
    goal_service, regular_payment_service, transaction_service,
};

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo123";

/// Seeds one demo household; does nothing when the demo user already exists
pub async fn seed_demo_data(state: &AppState) -> Result<(), DomainError> {
    if state.users.username_taken(DEMO_USERNAME).await? {
        tracing::debug!("Demo user already present, skipping seed");
        return Ok(());
    }

    let session = auth_service::register(
        state,
        RegisterInput {
            username: DEMO_USERNAME.to_string(),
            email: "demo@example.com".to_string(),
            password: DEMO_PASSWORD.to_string(),
            display_name: Some("Demo Parent".to_string()),
        },
    )
    .await?;
    let user_id = session.user.id;

    let family = family_service::create_family(
        state,
        user_id,
        FamilyNameInput {
            name: "Demo Family".to_string(),
        },
    )
    .await?;

    let today = chrono::Local::now().date_naive();
    let month_start = today.with_day(1).unwrap_or(today);
    let budget = budget_service::create_budget(
        state,
        user_id,
        BudgetInput {
            family_id: family.id,
            name: format!("Household {}", month_start.format("%B %Y")),
            budget_type: "monthly".to_string(),
            start_date: format_date(month_start),
            end_date: None,
            description: Some("Day-to-day spending".to_string()),
        },
    )
    .await?;

    let mut category_ids = Vec::new();
    for (name, kind, color) in [
        ("Salary", "income", "#2e7d32"),
        ("Groceries", "expense", "#ef6c00"),
        ("Utilities", "expense", "#1565c0"),
        ("Leisure", "expense", "#6a1b9a"),
    ] {
        let category = category_service::create_category(
            state,
            user_id,
            CategoryInput {
                budget_id: budget.id,
                name: name.to_string(),
                category_type: kind.to_string(),
                color: Some(color.to_string()),
                icon: None,
            },
        )
        .await?;
        category_ids.push(category.id);
    }
    let [salary, groceries, utilities, leisure] = category_ids[..] else {
        return Err(DomainError::Internal("demo categories were not created".into()));
    };

    for (category_id, amount, description) in [
        (salary, 3200.0, "Monthly salary"),
        (groceries, 84.30, "Weekly shop"),
        (groceries, 61.15, "Market"),
        (utilities, 120.0, "Electricity"),
        (leisure, 45.0, "Cinema"),
    ] {
        transaction_service::create_transaction(
            state,
            user_id,
            TransactionInput {
                budget_id: budget.id,
                category_id,
                amount,
                transaction_date: format_date(month_start),
                description: Some(description.to_string()),
            },
        )
        .await?;
    }

    let month_end = month_start + Duration::days(27);
    budget_limit_service::create_limit(
        state,
        user_id,
        BudgetLimitInput {
            category_id: groceries,
            amount: 400.0,
            start_date: format_date(month_start),
            end_date: format_date(month_end),
        },
    )
    .await?;

    goal_service::create_goal(
        state,
        user_id,
        GoalInput {
            family_id: family.id,
            name: "Summer holiday".to_string(),
            description: Some("Two weeks by the sea".to_string()),
            target_amount: 2500.0,
            current_amount: 600.0,
            deadline: format_date(today + Duration::days(180)),
            status: None,
        },
    )
    .await?;

    regular_payment_service::create_regular_payment(
        state,
        user_id,
        RegularPaymentInput {
            budget_id: budget.id,
            category_id: utilities,
            name: "Internet".to_string(),
            amount: 39.99,
            frequency: "monthly".to_string(),
            day_of_month: None,
            next_payment_date: format_date(today + Duration::days(1)),
            end_date: None,
            is_active: true,
            description: None,
        },
    )
    .await?;

    tracing::info!(
        "Demo data seeded: user '{}' / '{}', family join code {}",
        DEMO_USERNAME,
        DEMO_PASSWORD,
        family.join_code
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::init_db;

    #[tokio::test]
    async fn seeding_twice_is_harmless() {
        let state = AppState::new(init_db("sqlite::memory:").await.unwrap());
        seed_demo_data(&state).await.unwrap();
        seed_demo_data(&state).await.unwrap();

        let families = state.families.find_for_user(1).await.unwrap();
        assert_eq!(families.len(), 1);
    }
}
