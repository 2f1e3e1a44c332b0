//! SeaORM implementation of RegularPaymentRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::inputs::RegularPaymentInput;
use crate::domain::{DomainError, RegularPaymentRepository};
use crate::models::regular_payment::{self, Column, Entity as PaymentEntity};

/// SeaORM-based implementation of RegularPaymentRepository
pub struct SeaOrmRegularPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmRegularPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn require(&self, id: i32) -> Result<regular_payment::Model, DomainError> {
        PaymentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Regular payment"))
    }
}

#[async_trait]
impl RegularPaymentRepository for SeaOrmRegularPaymentRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<regular_payment::Model>, DomainError> {
        Ok(PaymentEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn list_by_budget(
        &self,
        budget_id: i32,
    ) -> Result<Vec<regular_payment::Model>, DomainError> {
        Ok(PaymentEntity::find()
            .filter(Column::BudgetId.eq(budget_id))
            .order_by_asc(Column::NextPaymentDate)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn list_due(&self, today: &str) -> Result<Vec<regular_payment::Model>, DomainError> {
        Ok(PaymentEntity::find()
            .filter(Column::IsActive.eq(true))
            .filter(Column::NextPaymentDate.lte(today))
            .order_by_asc(Column::NextPaymentDate)
            .all(&self.db)
            .await?)
    }

    async fn create(
        &self,
        input: RegularPaymentInput,
        created_by: i32,
    ) -> Result<regular_payment::Model, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = regular_payment::ActiveModel {
            budget_id: Set(input.budget_id),
            category_id: Set(input.category_id),
            name: Set(input.name),
            amount: Set(input.amount),
            frequency: Set(input.frequency),
            day_of_month: Set(input.day_of_month),
            next_payment_date: Set(input.next_payment_date),
            end_date: Set(input.end_date),
            is_active: Set(input.is_active),
            description: Set(input.description),
            created_by: Set(created_by),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        Ok(model.insert(&self.db).await?)
    }

    async fn update(
        &self,
        id: i32,
        input: RegularPaymentInput,
    ) -> Result<regular_payment::Model, DomainError> {
        let mut active: regular_payment::ActiveModel = self.require(id).await?.into();
        active.category_id = Set(input.category_id);
        active.name = Set(input.name);
        active.amount = Set(input.amount);
        active.frequency = Set(input.frequency);
        active.day_of_month = Set(input.day_of_month);
        active.next_payment_date = Set(input.next_payment_date);
        active.end_date = Set(input.end_date);
        active.is_active = Set(input.is_active);
        active.description = Set(input.description);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(active.update(&self.db).await?)
    }

    async fn advance_if(
        &self,
        id: i32,
        expected_next: &str,
        expected_active: bool,
        next_payment_date: String,
        is_active: bool,
    ) -> Result<bool, DomainError> {
        // Single conditional UPDATE, so concurrent runners cannot both win
        let result = PaymentEntity::update_many()
            .col_expr(Column::NextPaymentDate, Expr::value(next_payment_date))
            .col_expr(Column::IsActive, Expr::value(is_active))
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().to_rfc3339()))
            .filter(Column::Id.eq(id))
            .filter(Column::NextPaymentDate.eq(expected_next))
            .filter(Column::IsActive.eq(expected_active))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = PaymentEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Regular payment"));
        }

        Ok(())
    }
}
