//! SeaORM implementation of CategoryRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::inputs::CategoryInput;
use crate::domain::errors::is_unique_violation;
use crate::domain::{CategoryRepository, CategoryType, DomainError};
use crate::models::category::{self, Entity as CategoryEntity};

/// SeaORM-based implementation of CategoryRepository
pub struct SeaOrmCategoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn name_conflict(e: sea_orm::DbErr) -> DomainError {
    if is_unique_violation(&e, "categories.") {
        DomainError::conflict("A category with this name already exists in this budget")
    } else {
        e.into()
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<category::Model>, DomainError> {
        Ok(CategoryEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_by_budget(
        &self,
        budget_id: i32,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<category::Model>, DomainError> {
        let mut query = CategoryEntity::find().filter(category::Column::BudgetId.eq(budget_id));

        if let Some(kind) = category_type {
            query = query.filter(category::Column::CategoryType.eq(kind.as_str()));
        }

        Ok(query
            .order_by_asc(category::Column::CategoryType)
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?)
    }

    async fn find_by_name(
        &self,
        budget_id: i32,
        name: &str,
    ) -> Result<Option<category::Model>, DomainError> {
        // Same collation as idx_categories_budget_name
        Ok(CategoryEntity::find()
            .filter(category::Column::BudgetId.eq(budget_id))
            .filter(Expr::cust_with_values("name = ? COLLATE NOCASE", [name]))
            .one(&self.db)
            .await?)
    }

    async fn create(&self, input: CategoryInput) -> Result<category::Model, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = category::ActiveModel {
            budget_id: Set(input.budget_id),
            name: Set(input.name),
            category_type: Set(input.category_type),
            color: Set(input.color),
            icon: Set(input.icon),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        model.insert(&self.db).await.map_err(name_conflict)
    }

    async fn update(&self, id: i32, input: CategoryInput) -> Result<category::Model, DomainError> {
        let existing = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Category"))?;

        let mut active: category::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.category_type = Set(input.category_type);
        active.color = Set(input.color);
        active.icon = Set(input.icon);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active.update(&self.db).await.map_err(name_conflict)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = CategoryEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Category"));
        }

        Ok(())
    }
}
