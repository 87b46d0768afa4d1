use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tour_id: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub departure_date: String,
    pub end_date: Option<String>,
    pub pickup_location: Option<String>,
    pub pickup_address: Option<String>,
    /// Grand total computed at creation, decimal string
    pub total_price: String,
    pub booking_time: String,
    /// Lifecycle status.
    /// Valid values:
    /// - `PENDING`: created, awaiting confirmation
    /// - `CONFIRMED`: confirmed by admin or manual payment
    /// - `CANCELLED`: cancelled by the customer or admin
    /// - `COMPLETED`: tour delivered, counted as revenue
    pub status: String,
    pub payment_id: Option<String>,
    pub whatsapp_number: Option<String>,
    pub note_for_meetup: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tour::Entity",
        from = "Column::TourId",
        to = "super::tour::Column::Id"
    )]
    Tour,
    #[sea_orm(has_many = "super::booking_pricing_option::Entity")]
    PricingOptions,
    #[sea_orm(has_many = "super::booking_additional_service::Entity")]
    AdditionalServices,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payments,
}

impl Related<super::tour::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tour.def()
    }
}

impl Related<super::booking_pricing_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PricingOptions.def()
    }
}

impl Related<super::booking_additional_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdditionalServices.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
