use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tours")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub schedule_description: Option<String>,
    /// Base price as a decimal string
    pub price: String,
    /// Length in days
    pub duration: Option<i32>,
    pub image_url: Option<String>,
    pub min_pax: Option<i32>,
    pub max_pax: Option<i32>,
    pub rating: f32,
    pub featured: bool,
    pub youtube_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tour_attribute::Entity")]
    Attributes,
    #[sea_orm(has_many = "super::tour_pricing::Entity")]
    Pricing,
    #[sea_orm(has_many = "super::tour_review::Entity")]
    Reviews,
    #[sea_orm(has_many = "super::booking::Entity")]
    Bookings,
}

impl Related<super::tour_attribute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attributes.def()
    }
}

impl Related<super::tour_pricing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pricing.def()
    }
}

impl Related<super::tour_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::tour_category::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tour_category::Relation::Tour.def().rev())
    }
}

impl Related<super::additional_service::Entity> for Entity {
    fn to() -> RelationDef {
        super::tour_additional_service::Relation::AdditionalService.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tour_additional_service::Relation::Tour.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
