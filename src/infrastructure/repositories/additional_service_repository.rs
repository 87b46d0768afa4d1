//! SeaORM implementation of AdditionalServiceRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::values::{money_to_db, parse_money};
use crate::domain::{
    AdditionalService, AdditionalServiceInput, AdditionalServiceRepository, DomainError,
};
use crate::models::additional_service::{ActiveModel, Column, Entity as ServiceEntity, Model};
use crate::models::tour::Entity as TourEntity;

pub(crate) fn service_from_model(m: Model) -> Result<AdditionalService, DomainError> {
    Ok(AdditionalService {
        id: m.id,
        name: m.name,
        description: m.description,
        price: parse_money(&m.price)?,
        price_unit: m.price_unit,
    })
}

/// SeaORM-based implementation of AdditionalServiceRepository
pub struct SeaOrmAdditionalServiceRepository {
    db: DatabaseConnection,
}

impl SeaOrmAdditionalServiceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_name_free(&self, name: &str, except_id: Option<i32>) -> Result<(), DomainError> {
        let existing = ServiceEntity::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?;

        match existing {
            Some(s) if Some(s.id) != except_id => Err(DomainError::Conflict(format!(
                "Additional service with name '{}' already exists",
                name
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl AdditionalServiceRepository for SeaOrmAdditionalServiceRepository {
    async fn find_all(&self) -> Result<Vec<AdditionalService>, DomainError> {
        ServiceEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(service_from_model)
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<AdditionalService>, DomainError> {
        ServiceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(service_from_model)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<AdditionalService>, DomainError> {
        ServiceEntity::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await?
            .map(service_from_model)
            .transpose()
    }

    async fn find_by_tour(&self, tour_id: i32) -> Result<Vec<AdditionalService>, DomainError> {
        let tour = TourEntity::find_by_id(tour_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Tour", tour_id))?;

        tour.find_related(ServiceEntity)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(service_from_model)
            .collect()
    }

    async fn create(
        &self,
        input: AdditionalServiceInput,
    ) -> Result<AdditionalService, DomainError> {
        self.ensure_name_free(&input.name, None).await?;

        let service = ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            price: Set(money_to_db(input.price)),
            price_unit: Set(input.price_unit),
            ..Default::default()
        };

        let result = service.insert(&self.db).await?;
        tracing::info!("Created additional service {} ({})", result.name, result.id);
        service_from_model(result)
    }

    async fn update(
        &self,
        id: i32,
        input: AdditionalServiceInput,
    ) -> Result<AdditionalService, DomainError> {
        let existing = ServiceEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("AdditionalService", id))?;

        if existing.name != input.name {
            self.ensure_name_free(&input.name, Some(id)).await?;
        }

        let mut active: ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.price = Set(money_to_db(input.price));
        active.price_unit = Set(input.price_unit);

        let result = active.update(&self.db).await?;
        service_from_model(result)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = ServiceEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("AdditionalService", id));
        }

        Ok(())
    }
}
