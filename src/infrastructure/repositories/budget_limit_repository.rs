//! SeaORM implementation of BudgetLimitRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::inputs::BudgetLimitInput;
use crate::domain::{BudgetLimitRepository, DomainError};
use crate::models::budget_limit::{self, Column, Entity as LimitEntity};
use crate::models::category::{self, Entity as CategoryEntity};

/// SeaORM-based implementation of BudgetLimitRepository
pub struct SeaOrmBudgetLimitRepository {
    db: DatabaseConnection,
}

impl SeaOrmBudgetLimitRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BudgetLimitRepository for SeaOrmBudgetLimitRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<budget_limit::Model>, DomainError> {
        Ok(LimitEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_by_budget(
        &self,
        budget_id: i32,
    ) -> Result<Vec<(budget_limit::Model, category::Model)>, DomainError> {
        let rows = LimitEntity::find()
            .find_also_related(CategoryEntity)
            .filter(category::Column::BudgetId.eq(budget_id))
            .order_by_asc(Column::StartDate)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(limit, cat)| cat.map(|c| (limit, c)))
            .collect())
    }

    async fn list_covering(
        &self,
        category_id: i32,
        date: &str,
    ) -> Result<Vec<budget_limit::Model>, DomainError> {
        Ok(LimitEntity::find()
            .filter(Column::CategoryId.eq(category_id))
            .filter(Column::StartDate.lte(date))
            .filter(Column::EndDate.gte(date))
            .all(&self.db)
            .await?)
    }

    async fn create(&self, input: BudgetLimitInput) -> Result<budget_limit::Model, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = budget_limit::ActiveModel {
            category_id: Set(input.category_id),
            amount: Set(input.amount),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(model.insert(&self.db).await?)
    }

    async fn update(
        &self,
        id: i32,
        input: BudgetLimitInput,
    ) -> Result<budget_limit::Model, DomainError> {
        let existing = LimitEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Budget limit"))?;

        let mut active: budget_limit::ActiveModel = existing.into();
        active.amount = Set(input.amount);
        active.start_date = Set(input.start_date);
        active.end_date = Set(input.end_date);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(active.update(&self.db).await?)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = LimitEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Budget limit"));
        }

        Ok(())
    }
}
