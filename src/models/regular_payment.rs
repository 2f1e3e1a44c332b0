use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "regular_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub budget_id: i32,
    pub category_id: i32,
    pub name: String,
    pub amount: f64,
    pub frequency: String, // 'daily', 'weekly', 'monthly', 'yearly'
    pub day_of_month: Option<i32>,
    pub next_payment_date: String,
    pub end_date: Option<String>,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_by: i32,
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegularPaymentDto {
    pub id: i32,
    pub budget_id: i32,
    pub category_id: i32,
    pub name: String,
    pub amount: f64,
    pub frequency: String,
    pub day_of_month: Option<i32>,
    pub next_payment_date: String,
    pub end_date: Option<String>,
    pub is_active: bool,
    pub description: Option<String>,
    pub created_by: i32,
}

impl From<Model> for RegularPaymentDto {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            budget_id: model.budget_id,
            category_id: model.category_id,
            name: model.name,
            amount: model.amount,
            frequency: model.frequency,
            day_of_month: model.day_of_month,
            next_payment_date: model.next_payment_date,
            end_date: model.end_date,
            is_active: model.is_active,
            description: model.description,
            created_by: model.created_by,
        }
    }
}
