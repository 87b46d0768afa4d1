use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tour_additional_services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tour_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub additional_service_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tour::Entity",
        from = "Column::TourId",
        to = "super::tour::Column::Id",
        on_delete = "Cascade"
    )]
    Tour,
    #[sea_orm(
        belongs_to = "super::additional_service::Entity",
        from = "Column::AdditionalServiceId",
        to = "super::additional_service::Column::Id",
        on_delete = "Cascade"
    )]
    AdditionalService,
}

impl ActiveModelBehavior for ActiveModel {}
