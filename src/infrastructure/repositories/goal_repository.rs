//! SeaORM implementation of GoalRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::inputs::GoalInput;
use crate::domain::{DomainError, GoalRepository, GoalStatus};
use crate::models::financial_goal::{self, Column, Entity as GoalEntity};

/// SeaORM-based implementation of GoalRepository
pub struct SeaOrmGoalRepository {
    db: DatabaseConnection,
}

impl SeaOrmGoalRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn require(&self, id: i32) -> Result<financial_goal::Model, DomainError> {
        GoalEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Financial goal"))
    }
}

#[async_trait]
impl GoalRepository for SeaOrmGoalRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<financial_goal::Model>, DomainError> {
        Ok(GoalEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_by_family(
        &self,
        family_id: i32,
        status: Option<GoalStatus>,
    ) -> Result<Vec<financial_goal::Model>, DomainError> {
        let mut query = GoalEntity::find().filter(Column::FamilyId.eq(family_id));

        if let Some(status) = status {
            query = query.filter(Column::Status.eq(status.as_str()));
        }

        Ok(query
            .order_by_asc(Column::Deadline)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn create(
        &self,
        input: GoalInput,
        created_by: i32,
    ) -> Result<financial_goal::Model, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = financial_goal::ActiveModel {
            family_id: Set(input.family_id),
            name: Set(input.name),
            description: Set(input.description),
            target_amount: Set(input.target_amount),
            current_amount: Set(input.current_amount),
            deadline: Set(input.deadline),
            status: Set(input
                .status
                .unwrap_or_else(|| GoalStatus::Active.as_str().to_string())),
            created_by: Set(created_by),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(model.insert(&self.db).await?)
    }

    async fn update(&self, id: i32, input: GoalInput) -> Result<financial_goal::Model, DomainError> {
        let mut active: financial_goal::ActiveModel = self.require(id).await?.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.target_amount = Set(input.target_amount);
        active.current_amount = Set(input.current_amount);
        active.deadline = Set(input.deadline);
        if let Some(status) = input.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(active.update(&self.db).await?)
    }

    async fn set_progress(
        &self,
        id: i32,
        current_amount: f64,
        status: GoalStatus,
    ) -> Result<financial_goal::Model, DomainError> {
        let mut active: financial_goal::ActiveModel = self.require(id).await?.into();
        active.current_amount = Set(current_amount);
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(active.update(&self.db).await?)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = GoalEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Financial goal"));
        }

        Ok(())
    }
}
