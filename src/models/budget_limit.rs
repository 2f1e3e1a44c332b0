use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_limits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category_id: i32,
    pub amount: f64,
    pub start_date: String,
    pub end_date: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Limit with usage computed from the category's transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLimitDto {
    pub id: i32,
    pub category_id: i32,
    pub category_name: String,
    pub budget_id: i32,
    pub amount: f64,
    pub start_date: String,
    pub end_date: String,
    pub spent: f64,
    pub remaining: f64,
    pub percent_used: f64,
    pub is_exceeded: bool,
}
