use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub family_id: i32,
    pub name: String,
    pub budget_type: String, // 'monthly', 'yearly', 'special'
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub created_by: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::family::Entity",
        from = "Column::FamilyId",
        to = "super::family::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Family,
    #[sea_orm(has_many = "super::category::Entity")]
    Categories,
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::family::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Family.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetDto {
    pub id: i32,
    pub family_id: i32,
    pub name: String,
    pub budget_type: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub created_by: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Model> for BudgetDto {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            family_id: model.family_id,
            name: model.name,
            budget_type: model.budget_type,
            start_date: model.start_date,
            end_date: model.end_date,
            description: model.description,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
