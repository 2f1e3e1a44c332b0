//! SeaORM implementation of BudgetRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::inputs::BudgetInput;
use crate::domain::{BudgetRepository, DomainError};
use crate::models::budget::{self, Entity as BudgetEntity};

/// SeaORM-based implementation of BudgetRepository
pub struct SeaOrmBudgetRepository {
    db: DatabaseConnection,
}

impl SeaOrmBudgetRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BudgetRepository for SeaOrmBudgetRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<budget::Model>, DomainError> {
        Ok(BudgetEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_by_family(&self, family_id: i32) -> Result<Vec<budget::Model>, DomainError> {
        Ok(BudgetEntity::find()
            .filter(budget::Column::FamilyId.eq(family_id))
            .order_by_desc(budget::Column::StartDate)
            .order_by_asc(budget::Column::Name)
            .all(&self.db)
            .await?)
    }

    async fn create(&self, input: BudgetInput, created_by: i32) -> Result<budget::Model, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = budget::ActiveModel {
            family_id: Set(input.family_id),
            name: Set(input.name),
            budget_type: Set(input.budget_type),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            description: Set(input.description),
            created_by: Set(created_by),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(model.insert(&self.db).await?)
    }

    async fn update(&self, id: i32, input: BudgetInput) -> Result<budget::Model, DomainError> {
        let existing = BudgetEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Budget"))?;

        let mut active: budget::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.budget_type = Set(input.budget_type);
        active.start_date = Set(input.start_date);
        active.end_date = Set(input.end_date);
        active.description = Set(input.description);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(active.update(&self.db).await?)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = BudgetEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Budget"));
        }

        Ok(())
    }
}
