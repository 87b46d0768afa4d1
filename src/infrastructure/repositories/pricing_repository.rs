//! SeaORM implementation of PricingRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::values::{money_to_db, parse_money};
use crate::domain::{DomainError, PricingRepository, TourPricing, TourPricingInput};
use crate::models::tour::Entity as TourEntity;
use crate::models::tour_pricing::{ActiveModel, Column, Entity as PricingEntity, Model};

pub(crate) fn pricing_from_model(m: Model) -> Result<TourPricing, DomainError> {
    Ok(TourPricing {
        id: m.id,
        tour_id: m.tour_id,
        customer_type: m.customer_type,
        price: parse_money(&m.price)?,
        round_trip: m.round_trip,
    })
}

/// SeaORM-based implementation of PricingRepository
pub struct SeaOrmPricingRepository {
    db: DatabaseConnection,
}

impl SeaOrmPricingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// At most one tier per (tour, customer type, round trip)
    async fn ensure_unique(
        &self,
        tour_id: i32,
        input: &TourPricingInput,
        except_id: Option<i32>,
    ) -> Result<(), DomainError> {
        let existing = PricingEntity::find()
            .filter(Column::TourId.eq(tour_id))
            .filter(Column::CustomerType.eq(input.customer_type.as_str()))
            .filter(Column::RoundTrip.eq(input.round_trip))
            .one(&self.db)
            .await?;

        match existing {
            Some(p) if Some(p.id) != except_id => Err(DomainError::Conflict(format!(
                "Pricing for customer type '{}' (round trip: {}) already exists for tour {}",
                input.customer_type, input.round_trip, tour_id
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl PricingRepository for SeaOrmPricingRepository {
    async fn find_by_tour(&self, tour_id: i32) -> Result<Vec<TourPricing>, DomainError> {
        PricingEntity::find()
            .filter(Column::TourId.eq(tour_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(pricing_from_model)
            .collect()
    }

    async fn find_by_tour_and_round_trip(
        &self,
        tour_id: i32,
        round_trip: bool,
    ) -> Result<Vec<TourPricing>, DomainError> {
        PricingEntity::find()
            .filter(Column::TourId.eq(tour_id))
            .filter(Column::RoundTrip.eq(round_trip))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(pricing_from_model)
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<TourPricing>, DomainError> {
        PricingEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(pricing_from_model)
            .transpose()
    }

    async fn create(
        &self,
        tour_id: i32,
        input: TourPricingInput,
    ) -> Result<TourPricing, DomainError> {
        TourEntity::find_by_id(tour_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Tour", tour_id))?;

        self.ensure_unique(tour_id, &input, None).await?;

        let pricing = ActiveModel {
            tour_id: Set(tour_id),
            customer_type: Set(input.customer_type),
            price: Set(money_to_db(input.price)),
            round_trip: Set(input.round_trip),
            ..Default::default()
        };

        let result = pricing.insert(&self.db).await?;
        tracing::info!(
            "Created pricing tier {} for tour {} ({})",
            result.id,
            tour_id,
            result.customer_type
        );
        pricing_from_model(result)
    }

    async fn update(&self, id: i32, input: TourPricingInput) -> Result<TourPricing, DomainError> {
        let existing = PricingEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("TourPricing", id))?;

        self.ensure_unique(existing.tour_id, &input, Some(id)).await?;

        let mut active: ActiveModel = existing.into();
        active.customer_type = Set(input.customer_type);
        active.price = Set(money_to_db(input.price));
        active.round_trip = Set(input.round_trip);

        let result = active.update(&self.db).await?;
        pricing_from_model(result)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = PricingEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("TourPricing", id));
        }

        Ok(())
    }
}
