use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking_additional_services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub booking_id: i32,
    /// Catalog link, NULL when the requested service did not resolve
    pub additional_service_id: Option<i32>,
    pub service_name: String,
    pub service_type: Option<String>,
    pub price: String,
    pub quantity: i32,
    pub subtotal: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id",
        on_delete = "Cascade"
    )]
    Booking,
    #[sea_orm(
        belongs_to = "super::additional_service::Entity",
        from = "Column::AdditionalServiceId",
        to = "super::additional_service::Column::Id",
        on_delete = "SetNull"
    )]
    AdditionalService,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::additional_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdditionalService.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
