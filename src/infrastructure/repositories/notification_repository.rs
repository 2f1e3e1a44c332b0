//! SeaORM implementation of NotificationRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::{DomainError, NewNotification, NotificationRepository};
use crate::models::notification::{self, Column, Entity as NotificationEntity};

/// SeaORM-based implementation of NotificationRepository
pub struct SeaOrmNotificationRepository {
    db: DatabaseConnection,
}

impl SeaOrmNotificationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for SeaOrmNotificationRepository {
    async fn create(
        &self,
        new: NewNotification,
    ) -> Result<notification::Model, DomainError> {
        let model = notification::ActiveModel {
            user_id: Set(new.user_id),
            family_id: Set(new.family_id),
            notification_type: Set(new.notification_type.as_str().to_string()),
            title: Set(new.title),
            message: Set(new.message),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        Ok(model.insert(&self.db).await?)
    }

    async fn list_for_user(
        &self,
        user_id: i32,
        unread_only: bool,
    ) -> Result<Vec<notification::Model>, DomainError> {
        let mut query = NotificationEntity::find().filter(Column::UserId.eq(user_id));

        if unread_only {
            query = query.filter(Column::IsRead.eq(false));
        }

        Ok(query
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn count_unread(&self, user_id: i32) -> Result<u64, DomainError> {
        Ok(NotificationEntity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<notification::Model>, DomainError> {
        Ok(NotificationEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn mark_read(&self, id: i32) -> Result<notification::Model, DomainError> {
        let existing = NotificationEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Notification"))?;

        let mut active: notification::ActiveModel = existing.into();
        active.is_read = Set(true);
        Ok(active.update(&self.db).await?)
    }

    async fn mark_all_read(&self, user_id: i32) -> Result<u64, DomainError> {
        let result = NotificationEntity::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = NotificationEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Notification"));
        }

        Ok(())
    }
}
