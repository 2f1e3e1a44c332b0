//! SeaORM implementation of FamilyRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::domain::errors::is_unique_violation;
use crate::domain::{DomainError, FamilyRepository, FamilyRole};
use crate::models::family::{self, Entity as FamilyEntity};
use crate::models::family_member::{self, Entity as MemberEntity};
use crate::models::{FamilyMemberDto, user};

/// SeaORM-based implementation of FamilyRepository
pub struct SeaOrmFamilyRepository {
    db: DatabaseConnection,
}

impl SeaOrmFamilyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn require(&self, id: i32) -> Result<family::Model, DomainError> {
        FamilyEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Family"))
    }
}

#[async_trait]
impl FamilyRepository for SeaOrmFamilyRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<family::Model>, DomainError> {
        Ok(FamilyEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_join_code(&self, code: &str) -> Result<Option<family::Model>, DomainError> {
        Ok(FamilyEntity::find()
            .filter(family::Column::JoinCode.eq(code))
            .one(&self.db)
            .await?)
    }

    async fn join_code_exists(&self, code: &str) -> Result<bool, DomainError> {
        let count = FamilyEntity::find()
            .filter(family::Column::JoinCode.eq(code))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn find_for_user(&self, user_id: i32) -> Result<Vec<(family::Model, String)>, DomainError> {
        let rows = MemberEntity::find()
            .filter(family_member::Column::UserId.eq(user_id))
            .find_also_related(FamilyEntity)
            .order_by_asc(family_member::Column::JoinedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(member, family)| family.map(|f| (f, member.role)))
            .collect())
    }

    async fn create(
        &self,
        name: String,
        join_code: String,
        owner_id: i32,
    ) -> Result<family::Model, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let family = family::ActiveModel {
            name: Set(name),
            join_code: Set(join_code),
            created_by: Set(owner_id),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let owner = family_member::ActiveModel {
            family_id: Set(family.id),
            user_id: Set(owner_id),
            role: Set(FamilyRole::Owner.as_str().to_string()),
            joined_at: Set(now),
        };
        MemberEntity::insert(owner)
            .exec_without_returning(&txn)
            .await?;

        txn.commit().await?;
        Ok(family)
    }

    async fn rename(&self, id: i32, name: String) -> Result<family::Model, DomainError> {
        let mut active: family::ActiveModel = self.require(id).await?.into();
        active.name = Set(name);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        Ok(active.update(&self.db).await?)
    }

    async fn set_join_code(&self, id: i32, code: String) -> Result<family::Model, DomainError> {
        let mut active: family::ActiveModel = self.require(id).await?.into();
        active.join_code = Set(code);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        Ok(active.update(&self.db).await?)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = FamilyEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Family"));
        }

        Ok(())
    }

    async fn find_role(
        &self,
        family_id: i32,
        user_id: i32,
    ) -> Result<Option<FamilyRole>, DomainError> {
        let member = MemberEntity::find_by_id((family_id, user_id))
            .one(&self.db)
            .await?;

        match member {
            Some(m) => Ok(Some(m.role.parse()?)),
            None => Ok(None),
        }
    }

    async fn list_members(&self, family_id: i32) -> Result<Vec<FamilyMemberDto>, DomainError> {
        let rows = MemberEntity::find()
            .filter(family_member::Column::FamilyId.eq(family_id))
            .find_also_related(user::Entity)
            .order_by_asc(family_member::Column::JoinedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(member, user)| {
                user.map(|u| FamilyMemberDto {
                    user_id: u.id,
                    username: u.username,
                    display_name: u.display_name,
                    role: member.role,
                    joined_at: member.joined_at,
                })
            })
            .collect())
    }

    async fn member_ids(&self, family_id: i32) -> Result<Vec<i32>, DomainError> {
        let members = MemberEntity::find()
            .filter(family_member::Column::FamilyId.eq(family_id))
            .all(&self.db)
            .await?;
        Ok(members.into_iter().map(|m| m.user_id).collect())
    }

    async fn add_member(
        &self,
        family_id: i32,
        user_id: i32,
        role: FamilyRole,
    ) -> Result<(), DomainError> {
        let member = family_member::ActiveModel {
            family_id: Set(family_id),
            user_id: Set(user_id),
            role: Set(role.as_str().to_string()),
            joined_at: Set(chrono::Utc::now().to_rfc3339()),
        };
        MemberEntity::insert(member)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e, "family_members.") {
                    DomainError::conflict("You are already a member of this family")
                } else {
                    e.into()
                }
            })?;
        Ok(())
    }

    async fn set_role(
        &self,
        family_id: i32,
        user_id: i32,
        role: FamilyRole,
    ) -> Result<(), DomainError> {
        let result = MemberEntity::update_many()
            .col_expr(family_member::Column::Role, Expr::value(role.as_str()))
            .filter(family_member::Column::FamilyId.eq(family_id))
            .filter(family_member::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Member"));
        }
        Ok(())
    }

    async fn remove_member(&self, family_id: i32, user_id: i32) -> Result<(), DomainError> {
        let result = MemberEntity::delete_many()
            .filter(family_member::Column::FamilyId.eq(family_id))
            .filter(family_member::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Member"));
        }
        Ok(())
    }
}
