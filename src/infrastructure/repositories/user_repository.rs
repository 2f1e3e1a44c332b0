//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::domain::errors::is_unique_violation;
use crate::domain::{DomainError, NewUser, UserRepository};
use crate::models::user::{self, Entity as UserEntity};

/// SeaORM-based implementation of UserRepository
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, DomainError> {
        Ok(UserEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<user::Model>, DomainError> {
        let condition = Condition::any()
            .add(user::Column::Username.eq(login))
            .add(user::Column::Email.eq(login.to_lowercase()));

        Ok(UserEntity::find().filter(condition).one(&self.db).await?)
    }

    async fn username_taken(&self, username: &str) -> Result<bool, DomainError> {
        let count = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn email_taken(&self, email: &str) -> Result<bool, DomainError> {
        let count = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, new_user: NewUser) -> Result<user::Model, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = user::ActiveModel {
            username: Set(new_user.username),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            display_name: Set(new_user.display_name),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e, "users.email") {
                DomainError::conflict("Email is already registered")
            } else if is_unique_violation(&e, "users.username") {
                DomainError::conflict("Username is already taken")
            } else {
                e.into()
            }
        })
    }
}
