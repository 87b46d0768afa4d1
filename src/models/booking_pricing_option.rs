use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Pricing tier line item, snapshotted at booking time
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking_pricing_options")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub booking_id: i32,
    /// Tier the line was priced from
    pub pricing_option_id: i32,
    pub customer_type: String,
    pub round_trip: bool,
    pub quantity: i32,
    pub price: String,
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
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
