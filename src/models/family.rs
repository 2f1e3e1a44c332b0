use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "families")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub join_code: String,
    pub created_by: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::family_member::Entity")]
    Members,
    #[sea_orm(has_many = "super::budget::Entity")]
    Budgets,
    #[sea_orm(has_many = "super::financial_goal::Entity")]
    Goals,
}

impl Related<super::family_member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Member entry as shown in a family's detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyMemberDto {
    pub user_id: i32,
    pub username: String,
    pub display_name: Option<String>,
    pub role: String,
    pub joined_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyDto {
    pub id: i32,
    pub name: String,
    pub join_code: String,
    pub created_by: i32,
    /// Role of the requesting user
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<FamilyMemberDto>>,
    pub created_at: String,
}

impl FamilyDto {
    pub fn from_model(model: Model, role: &str) -> Self {
        Self {
            id: model.id,
            name: model.name,
            join_code: model.join_code,
            created_by: model.created_by,
            role: role.to_string(),
            members: None,
            created_at: model.created_at,
        }
    }
}
