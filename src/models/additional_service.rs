use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "additional_services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    /// Unit price as a decimal string
    pub price: String,
    /// Display label, e.g. "per person"
    pub price_unit: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::tour::Entity> for Entity {
    fn to() -> RelationDef {
        super::tour_additional_service::Relation::Tour.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tour_additional_service::Relation::AdditionalService.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
