//! SeaORM implementation of TourRepository
//!
//! A tour is stored as one `tours` row plus element-collection rows in
//! `tour_attributes`, join rows in `tour_categories` and
//! `tour_additional_services`, and owned `tour_pricing` / `tour_reviews`
//! rows. Reads assemble all of them with one query per table for a whole
//! page of tours.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Order};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

use super::additional_service_repository::service_from_model;
use super::pricing_repository::pricing_from_model;
use super::review_repository::review_from_model;
use crate::domain::values::{money_to_db, parse_money};
use crate::domain::{
    DomainError, Page, PageRequest, Tour, TourAttributeKind, TourInput, TourRepository,
    TourServiceRef, TourSort,
};
use crate::models::{
    additional_service, booking, category, tour, tour_additional_service, tour_attribute,
    tour_category, tour_pricing, tour_review,
};

/// SeaORM-based implementation of TourRepository
pub struct SeaOrmTourRepository {
    db: DatabaseConnection,
}

impl SeaOrmTourRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn fetch_page(
        &self,
        query: Select<tour::Entity>,
        request: PageRequest,
    ) -> Result<Page<Tour>, DomainError> {
        let paginator = query.paginate(&self.db, request.size);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(request.page).await?;
        let tours = assemble(&self.db, rows).await?;
        Ok(Page::new(tours, total, request))
    }

    async fn load_one(&self, id: i32) -> Result<Tour, DomainError> {
        let row = tour::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Tour", id))?;
        assemble(&self.db, vec![row])
            .await?
            .pop()
            .ok_or_else(|| DomainError::not_found("Tour", id))
    }
}

fn sorted(query: Select<tour::Entity>, sort: TourSort) -> Select<tour::Entity> {
    match sort {
        TourSort::Id => query.order_by_asc(tour::Column::Id),
        TourSort::Title => query.order_by_asc(tour::Column::Title),
        // Stored as text; cast for ordering only
        TourSort::Price => query.order_by(Expr::cust("CAST(price AS REAL)"), Order::Asc),
        TourSort::Rating => query.order_by_asc(tour::Column::Rating),
        TourSort::Duration => query.order_by_asc(tour::Column::Duration),
    }
}

/// Keeps the first occurrence of each value, in input order.
fn dedup(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && seen.insert(v.clone()))
        .collect()
}

/// Loads every related table for `rows` and builds full tours, preserving
/// the order of `rows`.
async fn assemble<C: ConnectionTrait>(
    conn: &C,
    rows: Vec<tour::Model>,
) -> Result<Vec<Tour>, DomainError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = rows.iter().map(|t| t.id).collect();

    let attributes = tour_attribute::Entity::find()
        .filter(tour_attribute::Column::TourId.is_in(ids.clone()))
        .order_by_asc(tour_attribute::Column::Id)
        .all(conn)
        .await?;

    let category_links = tour_category::Entity::find()
        .filter(tour_category::Column::TourId.is_in(ids.clone()))
        .all(conn)
        .await?;
    let categories: HashMap<i32, String> = category::Entity::find()
        .filter(category::Column::Id.is_in(category_links.iter().map(|l| l.category_id)))
        .all(conn)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let service_links = tour_additional_service::Entity::find()
        .filter(tour_additional_service::Column::TourId.is_in(ids.clone()))
        .all(conn)
        .await?;
    let mut services = HashMap::new();
    for model in additional_service::Entity::find()
        .filter(
            additional_service::Column::Id
                .is_in(service_links.iter().map(|l| l.additional_service_id)),
        )
        .all(conn)
        .await?
    {
        services.insert(model.id, service_from_model(model)?);
    }

    let pricing = tour_pricing::Entity::find()
        .filter(tour_pricing::Column::TourId.is_in(ids.clone()))
        .order_by_asc(tour_pricing::Column::Id)
        .all(conn)
        .await?;

    let reviews = tour_review::Entity::find()
        .filter(tour_review::Column::TourId.is_in(ids))
        .order_by_desc(tour_review::Column::ReviewDate)
        .all(conn)
        .await?;

    let mut tours = Vec::with_capacity(rows.len());
    for row in rows {
        let mut tour = Tour {
            id: row.id,
            title: row.title,
            description: row.description,
            schedule_description: row.schedule_description,
            price: parse_money(&row.price)?,
            duration: row.duration,
            image_url: row.image_url,
            min_pax: row.min_pax,
            max_pax: row.max_pax,
            rating: row.rating,
            featured: row.featured,
            youtube_url: row.youtube_url,
            images: Vec::new(),
            highlights: Vec::new(),
            included_services: Vec::new(),
            excluded_services: Vec::new(),
            pickup_points: Vec::new(),
            available_guides: Vec::new(),
            categories: Vec::new(),
            additional_services: Vec::new(),
            pricing_options: Vec::new(),
            reviews: Vec::new(),
        };

        for attr in attributes.iter().filter(|a| a.tour_id == tour.id) {
            let target = match TourAttributeKind::ALL
                .iter()
                .find(|k| k.as_str() == attr.kind)
            {
                Some(TourAttributeKind::Image) => &mut tour.images,
                Some(TourAttributeKind::Highlight) => &mut tour.highlights,
                Some(TourAttributeKind::IncludedService) => &mut tour.included_services,
                Some(TourAttributeKind::ExcludedService) => &mut tour.excluded_services,
                Some(TourAttributeKind::PickupPoint) => &mut tour.pickup_points,
                Some(TourAttributeKind::Guide) => &mut tour.available_guides,
                None => {
                    tracing::warn!("Ignoring unknown tour attribute kind {}", attr.kind);
                    continue;
                }
            };
            target.push(attr.value.clone());
        }

        tour.categories = category_links
            .iter()
            .filter(|l| l.tour_id == tour.id)
            .filter_map(|l| categories.get(&l.category_id).cloned())
            .collect();
        tour.categories.sort();

        tour.additional_services = service_links
            .iter()
            .filter(|l| l.tour_id == tour.id)
            .filter_map(|l| services.get(&l.additional_service_id).cloned())
            .collect();
        tour.additional_services.sort_by_key(|s| s.id);

        for p in pricing.iter().filter(|p| p.tour_id == tour.id) {
            tour.pricing_options.push(pricing_from_model(p.clone())?);
        }
        for r in reviews.iter().filter(|r| r.tour_id == tour.id) {
            tour.reviews.push(review_from_model(r.clone())?);
        }

        tours.push(tour);
    }

    Ok(tours)
}

async fn resolve_category<C: ConnectionTrait>(conn: &C, name: &str) -> Result<i32, DomainError> {
    let existing = category::Entity::find()
        .filter(category::Column::Name.eq(name))
        .one(conn)
        .await?;
    if let Some(c) = existing {
        return Ok(c.id);
    }

    let created = category::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    tracing::info!("Created category {} while saving tour", created.name);
    Ok(created.id)
}

/// Resolves by id, then by name, otherwise creates the service.
async fn resolve_service<C: ConnectionTrait>(
    conn: &C,
    service: &TourServiceRef,
) -> Result<i32, DomainError> {
    if let Some(id) = service.id {
        if let Some(found) = additional_service::Entity::find_by_id(id).one(conn).await? {
            return Ok(found.id);
        }
    }

    let name = service
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            DomainError::Validation("Additional service requires an id or a name".to_string())
        })?;

    let existing = additional_service::Entity::find()
        .filter(additional_service::Column::Name.eq(name))
        .one(conn)
        .await?;
    if let Some(found) = existing {
        return Ok(found.id);
    }

    let created = additional_service::ActiveModel {
        name: Set(name.to_string()),
        description: Set(service.description.clone()),
        price: Set(money_to_db(service.price.unwrap_or(Decimal::ZERO))),
        price_unit: Set(service.price_unit.clone()),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    tracing::info!("Created additional service {} while saving tour", created.name);
    Ok(created.id)
}

/// Writes every collection present in `input`, replacing existing rows.
async fn write_collections<C: ConnectionTrait>(
    conn: &C,
    tour_id: i32,
    input: &TourInput,
) -> Result<(), DomainError> {
    for kind in TourAttributeKind::ALL {
        let Some(values) = input.attribute(kind) else {
            continue;
        };
        tour_attribute::Entity::delete_many()
            .filter(tour_attribute::Column::TourId.eq(tour_id))
            .filter(tour_attribute::Column::Kind.eq(kind.as_str()))
            .exec(conn)
            .await?;
        for value in dedup(values) {
            tour_attribute::ActiveModel {
                tour_id: Set(tour_id),
                kind: Set(kind.as_str().to_string()),
                value: Set(value),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
    }

    if let Some(names) = &input.categories {
        tour_category::Entity::delete_many()
            .filter(tour_category::Column::TourId.eq(tour_id))
            .exec(conn)
            .await?;
        let mut linked = HashSet::new();
        for name in dedup(names) {
            let category_id = resolve_category(conn, &name).await?;
            if linked.insert(category_id) {
                tour_category::ActiveModel {
                    tour_id: Set(tour_id),
                    category_id: Set(category_id),
                }
                .insert(conn)
                .await?;
            }
        }
    }

    if let Some(refs) = &input.additional_services {
        tour_additional_service::Entity::delete_many()
            .filter(tour_additional_service::Column::TourId.eq(tour_id))
            .exec(conn)
            .await?;
        let mut linked = HashSet::new();
        for service in refs {
            let service_id = resolve_service(conn, service).await?;
            if linked.insert(service_id) {
                tour_additional_service::ActiveModel {
                    tour_id: Set(tour_id),
                    additional_service_id: Set(service_id),
                }
                .insert(conn)
                .await?;
            }
        }
    }

    if let Some(options) = &input.pricing_options {
        tour_pricing::Entity::delete_many()
            .filter(tour_pricing::Column::TourId.eq(tour_id))
            .exec(conn)
            .await?;
        let mut seen = HashSet::new();
        for option in options {
            if !seen.insert((option.customer_type.clone(), option.round_trip)) {
                return Err(DomainError::Conflict(format!(
                    "Duplicate pricing for customer type '{}' (round trip: {})",
                    option.customer_type, option.round_trip
                )));
            }
            tour_pricing::ActiveModel {
                tour_id: Set(tour_id),
                customer_type: Set(option.customer_type.clone()),
                price: Set(money_to_db(option.price)),
                round_trip: Set(option.round_trip),
                ..Default::default()
            }
            .insert(conn)
            .await?;
        }
    }

    Ok(())
}

fn validate_input(input: &TourInput) -> Result<(), DomainError> {
    if input.title.trim().is_empty() {
        return Err(DomainError::Validation("Tour title is required".to_string()));
    }
    if input.price < Decimal::ZERO {
        return Err(DomainError::Validation(
            "Tour price must not be negative".to_string(),
        ));
    }
    if let (Some(min), Some(max)) = (input.min_pax, input.max_pax) {
        if min > max {
            return Err(DomainError::Validation(format!(
                "minPax ({}) exceeds maxPax ({})",
                min, max
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl TourRepository for SeaOrmTourRepository {
    async fn find_page(
        &self,
        request: PageRequest,
        sort: TourSort,
    ) -> Result<Page<Tour>, DomainError> {
        self.fetch_page(sorted(tour::Entity::find(), sort), request)
            .await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tour>, DomainError> {
        match self.load_one(id).await {
            Ok(tour) => Ok(Some(tour)),
            Err(DomainError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn find_featured(&self, request: PageRequest) -> Result<Page<Tour>, DomainError> {
        let query = tour::Entity::find()
            .filter(tour::Column::Featured.eq(true))
            .order_by_asc(tour::Column::Id);
        self.fetch_page(query, request).await
    }

    async fn find_by_category(
        &self,
        category_name: &str,
        request: PageRequest,
    ) -> Result<Page<Tour>, DomainError> {
        let category = category::Entity::find()
            .filter(category::Column::Name.eq(category_name))
            .one(&self.db)
            .await?;

        match category {
            Some(category) => {
                let query = category
                    .find_related(tour::Entity)
                    .order_by_asc(tour::Column::Id);
                self.fetch_page(query, request).await
            }
            None => Ok(Page::new(Vec::new(), 0, request)),
        }
    }

    async fn search(&self, query: &str, request: PageRequest) -> Result<Page<Tour>, DomainError> {
        let term = query.trim();
        let select = tour::Entity::find()
            .filter(
                tour::Column::Title
                    .contains(term)
                    .or(tour::Column::Description.contains(term)),
            )
            .order_by_asc(tour::Column::Id);
        self.fetch_page(select, request).await
    }

    async fn find_top_rated(&self, limit: u64) -> Result<Vec<Tour>, DomainError> {
        let rows = tour::Entity::find()
            .order_by_desc(tour::Column::Rating)
            .order_by_asc(tour::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        assemble(&self.db, rows).await
    }

    async fn create(&self, input: TourInput) -> Result<Tour, DomainError> {
        validate_input(&input)?;

        let txn = self.db.begin().await?;

        let row = tour::ActiveModel {
            title: Set(input.title.clone()),
            description: Set(input.description.clone()),
            schedule_description: Set(input.schedule_description.clone()),
            price: Set(money_to_db(input.price)),
            duration: Set(input.duration),
            image_url: Set(input.image_url.clone()),
            min_pax: Set(input.min_pax),
            max_pax: Set(input.max_pax),
            rating: Set(input.rating.unwrap_or(0.0)),
            featured: Set(input.featured),
            youtube_url: Set(input.youtube_url.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        write_collections(&txn, row.id, &input).await?;
        txn.commit().await?;

        tracing::info!("Created tour {} ({})", row.title, row.id);
        self.load_one(row.id).await
    }

    async fn update(&self, id: i32, input: TourInput) -> Result<Tour, DomainError> {
        validate_input(&input)?;

        let txn = self.db.begin().await?;

        let existing = tour::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DomainError::not_found("Tour", id))?;

        let mut active: tour::ActiveModel = existing.into();
        active.title = Set(input.title.clone());
        active.description = Set(input.description.clone());
        active.schedule_description = Set(input.schedule_description.clone());
        active.price = Set(money_to_db(input.price));
        active.duration = Set(input.duration);
        active.image_url = Set(input.image_url.clone());
        active.min_pax = Set(input.min_pax);
        active.max_pax = Set(input.max_pax);
        active.featured = Set(input.featured);
        active.youtube_url = Set(input.youtube_url.clone());
        if let Some(rating) = input.rating {
            active.rating = Set(rating);
        }
        active.update(&txn).await?;

        write_collections(&txn, id, &input).await?;
        txn.commit().await?;

        tracing::info!("Updated tour {}", id);
        self.load_one(id).await
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let bookings = booking::Entity::find()
            .filter(booking::Column::TourId.eq(id))
            .count(&self.db)
            .await?;
        if bookings > 0 {
            return Err(DomainError::Conflict(format!(
                "Tour {} still has {} booking(s)",
                id, bookings
            )));
        }

        let result = tour::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Tour", id));
        }

        tracing::info!("Deleted tour {}", id);
        Ok(())
    }

    async fn is_service_linked(&self, tour_id: i32, service_id: i32) -> Result<bool, DomainError> {
        let link = tour_additional_service::Entity::find_by_id((tour_id, service_id))
            .one(&self.db)
            .await?;
        Ok(link.is_some())
    }

    async fn link_service(&self, tour_id: i32, service_id: i32) -> Result<(), DomainError> {
        tour::Entity::find_by_id(tour_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Tour", tour_id))?;
        additional_service::Entity::find_by_id(service_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("AdditionalService", service_id))?;

        if self.is_service_linked(tour_id, service_id).await? {
            return Ok(());
        }

        tour_additional_service::ActiveModel {
            tour_id: Set(tour_id),
            additional_service_id: Set(service_id),
        }
        .insert(&self.db)
        .await?;

        tracing::info!("Linked additional service {} to tour {}", service_id, tour_id);
        Ok(())
    }

    async fn unlink_service(&self, tour_id: i32, service_id: i32) -> Result<u64, DomainError> {
        let result = tour_additional_service::Entity::delete_by_id((tour_id, service_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "TourAdditionalService",
                id: format!("{}/{}", tour_id, service_id),
            });
        }

        let remaining = tour_additional_service::Entity::find()
            .filter(tour_additional_service::Column::AdditionalServiceId.eq(service_id))
            .count(&self.db)
            .await?;
        Ok(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let values = vec![
            "Hanoi".to_string(),
            " Halong ".to_string(),
            "Hanoi".to_string(),
            "".to_string(),
        ];
        assert_eq!(dedup(&values), vec!["Hanoi", "Halong"]);
    }
}
