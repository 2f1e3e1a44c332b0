use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub budget_id: i32,
    pub category_id: i32,
    pub amount: f64,
    pub transaction_date: String,
    pub description: Option<String>,
    pub created_by: i32,
    pub regular_payment_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budget::Entity",
        from = "Column::BudgetId",
        to = "super::budget::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Budget,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Transaction joined with its category for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDto {
    pub id: i32,
    pub budget_id: i32,
    pub category_id: i32,
    pub category_name: String,
    /// 'income' or 'expense', taken from the category
    pub transaction_type: String,
    pub amount: f64,
    pub transaction_date: String,
    pub description: Option<String>,
    pub created_by: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regular_payment_id: Option<i32>,
    pub created_at: String,
}

impl TransactionDto {
    pub fn from_parts(model: Model, category: &super::category::Model) -> Self {
        Self {
            id: model.id,
            budget_id: model.budget_id,
            category_id: model.category_id,
            category_name: category.name.clone(),
            transaction_type: category.category_type.clone(),
            amount: model.amount,
            transaction_date: model.transaction_date,
            description: model.description,
            created_by: model.created_by,
            regular_payment_id: model.regular_payment_id,
            created_at: model.created_at,
        }
    }
}
