//! SeaORM implementation of TransactionRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::domain::{DomainError, NewTransaction, TransactionFilter, TransactionRepository};
use crate::models::category::{self, Entity as CategoryEntity};
use crate::models::transaction::{self, Column, Entity as TransactionEntity};

/// SeaORM-based implementation of TransactionRepository
pub struct SeaOrmTransactionRepository {
    db: DatabaseConnection,
}

impl SeaOrmTransactionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionRepository for SeaOrmTransactionRepository {
    async fn find_by_id(
        &self,
        id: i32,
    ) -> Result<Option<(transaction::Model, category::Model)>, DomainError> {
        let row = TransactionEntity::find_by_id(id)
            .find_also_related(CategoryEntity)
            .one(&self.db)
            .await?;

        Ok(row.and_then(|(tx, cat)| cat.map(|c| (tx, c))))
    }

    async fn list(
        &self,
        filter: TransactionFilter,
    ) -> Result<Vec<(transaction::Model, category::Model)>, DomainError> {
        let mut query = TransactionEntity::find()
            .find_also_related(CategoryEntity)
            .filter(Column::BudgetId.eq(filter.budget_id));

        if let Some(from) = &filter.from {
            query = query.filter(Column::TransactionDate.gte(from.as_str()));
        }

        if let Some(to) = &filter.to {
            query = query.filter(Column::TransactionDate.lte(to.as_str()));
        }

        if let Some(category_id) = filter.category_id {
            query = query.filter(Column::CategoryId.eq(category_id));
        }

        if let Some(kind) = filter.category_type {
            query = query.filter(category::Column::CategoryType.eq(kind.as_str()));
        }

        let rows = query
            .order_by_desc(Column::TransactionDate)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(tx, cat)| cat.map(|c| (tx, c)))
            .collect())
    }

    async fn create(&self, tx: NewTransaction) -> Result<transaction::Model, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = transaction::ActiveModel {
            budget_id: Set(tx.budget_id),
            category_id: Set(tx.category_id),
            amount: Set(tx.amount),
            transaction_date: Set(tx.transaction_date),
            description: Set(tx.description),
            created_by: Set(tx.created_by),
            regular_payment_id: Set(tx.regular_payment_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(model.insert(&self.db).await?)
    }

    async fn update(
        &self,
        id: i32,
        category_id: i32,
        amount: f64,
        transaction_date: String,
        description: Option<String>,
    ) -> Result<transaction::Model, DomainError> {
        let existing = TransactionEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Transaction"))?;

        let mut active: transaction::ActiveModel = existing.into();
        active.category_id = Set(category_id);
        active.amount = Set(amount);
        active.transaction_date = Set(transaction_date);
        active.description = Set(description);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(active.update(&self.db).await?)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = TransactionEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Transaction"));
        }

        Ok(())
    }

    async fn sum_for_category(
        &self,
        category_id: i32,
        start: &str,
        end: &str,
    ) -> Result<f64, DomainError> {
        let total: Option<Option<f64>> = TransactionEntity::find()
            .select_only()
            .column_as(Expr::col(Column::Amount).sum(), "total")
            .filter(Column::CategoryId.eq(category_id))
            .filter(Column::TransactionDate.gte(start))
            .filter(Column::TransactionDate.lte(end))
            .into_tuple()
            .one(&self.db)
            .await?;

        // SUM over no rows is NULL
        Ok(total.flatten().unwrap_or(0.0))
    }
}
