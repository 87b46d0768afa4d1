//! Repository trait definitions for the tour catalog
//!
//! These traits define the contract for catalog data access.
//! Implementations live in the infrastructure layer. Booking workflows are
//! transactional across several tables and live in `services` instead.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::DomainError;

/// Zero-based page request
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u64 = 10;
    pub const MAX_SIZE: u64 = 100;

    pub fn new(page: Option<u64>, size: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(0),
            size: size
                .unwrap_or(Self::DEFAULT_SIZE)
                .clamp(1, Self::MAX_SIZE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results with totals
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub page: u64,
    pub size: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, total_elements: u64, request: PageRequest) -> Self {
        Self {
            content,
            total_elements,
            total_pages: total_elements.div_ceil(request.size),
            page: request.page,
            size: request.size,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            page: self.page,
            size: self.size,
        }
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_page(&self, request: PageRequest) -> Result<Page<Category>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Category>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, DomainError>;

    /// Conflict if the name is already taken
    async fn create(&self, input: CategoryInput) -> Result<Category, DomainError>;

    async fn update(&self, id: i32, input: CategoryInput) -> Result<Category, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

// ---------------------------------------------------------------------------
// Pricing tiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourPricing {
    pub id: i32,
    pub tour_id: i32,
    pub customer_type: String,
    pub price: Decimal,
    pub round_trip: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TourPricingInput {
    #[validate(length(min = 1, message = "customerType is required"))]
    pub customer_type: String,
    pub price: Decimal,
    #[serde(default, alias = "isRoundTrip")]
    pub round_trip: bool,
}

#[async_trait]
pub trait PricingRepository: Send + Sync {
    async fn find_by_tour(&self, tour_id: i32) -> Result<Vec<TourPricing>, DomainError>;

    async fn find_by_tour_and_round_trip(
        &self,
        tour_id: i32,
        round_trip: bool,
    ) -> Result<Vec<TourPricing>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<TourPricing>, DomainError>;

    /// NotFound if the tour is absent, Conflict if (tour, customer type,
    /// round trip) already has a tier
    async fn create(&self, tour_id: i32, input: TourPricingInput)
    -> Result<TourPricing, DomainError>;

    async fn update(&self, id: i32, input: TourPricingInput) -> Result<TourPricing, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

// ---------------------------------------------------------------------------
// Additional services
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalService {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub price_unit: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalServiceInput {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub price_unit: Option<String>,
}

#[async_trait]
pub trait AdditionalServiceRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<AdditionalService>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<AdditionalService>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<AdditionalService>, DomainError>;

    async fn find_by_tour(&self, tour_id: i32) -> Result<Vec<AdditionalService>, DomainError>;

    /// Conflict if the name is already taken
    async fn create(&self, input: AdditionalServiceInput)
    -> Result<AdditionalService, DomainError>;

    /// Conflict if renamed onto another service's name
    async fn update(
        &self,
        id: i32,
        input: AdditionalServiceInput,
    ) -> Result<AdditionalService, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TourReview {
    pub id: i32,
    pub tour_id: i32,
    pub platform: Option<String>,
    pub rating: f32,
    pub comment: Option<String>,
    pub reviewer_name: Option<String>,
    pub review_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TourReviewInput {
    pub platform: Option<String>,
    #[validate(range(min = 0.0, max = 5.0, message = "rating must be between 0 and 5"))]
    pub rating: f32,
    pub comment: Option<String>,
    pub reviewer_name: Option<String>,
    /// Defaults to today on creation
    pub review_date: Option<NaiveDate>,
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn find_by_tour(&self, tour_id: i32) -> Result<Vec<TourReview>, DomainError>;

    async fn find_by_tour_and_platform(
        &self,
        tour_id: i32,
        platform: &str,
    ) -> Result<Vec<TourReview>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<TourReview>, DomainError>;

    /// NotFound if the tour is absent
    async fn count_by_tour(&self, tour_id: i32) -> Result<u64, DomainError>;

    async fn create(&self, tour_id: i32, input: TourReviewInput)
    -> Result<TourReview, DomainError>;

    async fn update(&self, id: i32, input: TourReviewInput) -> Result<TourReview, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

// ---------------------------------------------------------------------------
// Tours
// ---------------------------------------------------------------------------

/// Element-collection kinds stored in `tour_attributes`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourAttributeKind {
    Image,
    Highlight,
    IncludedService,
    ExcludedService,
    PickupPoint,
    Guide,
}

impl TourAttributeKind {
    pub const ALL: [TourAttributeKind; 6] = [
        TourAttributeKind::Image,
        TourAttributeKind::Highlight,
        TourAttributeKind::IncludedService,
        TourAttributeKind::ExcludedService,
        TourAttributeKind::PickupPoint,
        TourAttributeKind::Guide,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TourAttributeKind::Image => "IMAGE",
            TourAttributeKind::Highlight => "HIGHLIGHT",
            TourAttributeKind::IncludedService => "INCLUDED",
            TourAttributeKind::ExcludedService => "EXCLUDED",
            TourAttributeKind::PickupPoint => "PICKUP",
            TourAttributeKind::Guide => "GUIDE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub schedule_description: Option<String>,
    pub price: Decimal,
    pub duration: Option<i32>,
    pub image_url: Option<String>,
    pub min_pax: Option<i32>,
    pub max_pax: Option<i32>,
    pub rating: f32,
    pub featured: bool,
    pub youtube_url: Option<String>,
    pub images: Vec<String>,
    pub highlights: Vec<String>,
    pub included_services: Vec<String>,
    pub excluded_services: Vec<String>,
    pub pickup_points: Vec<String>,
    pub available_guides: Vec<String>,
    pub categories: Vec<String>,
    pub additional_services: Vec<AdditionalService>,
    pub pricing_options: Vec<TourPricing>,
    pub reviews: Vec<TourReview>,
}

impl Tour {
    pub fn attribute(&self, kind: TourAttributeKind) -> &[String] {
        match kind {
            TourAttributeKind::Image => &self.images,
            TourAttributeKind::Highlight => &self.highlights,
            TourAttributeKind::IncludedService => &self.included_services,
            TourAttributeKind::ExcludedService => &self.excluded_services,
            TourAttributeKind::PickupPoint => &self.pickup_points,
            TourAttributeKind::Guide => &self.available_guides,
        }
    }
}

/// A service reference on a tour write: resolved by id, then by name,
/// otherwise created from the supplied fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourServiceRef {
    pub id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub price_unit: Option<String>,
}

/// Tour write model. Collection fields left out (`None`) keep their
/// current rows on update; `Some` replaces them.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TourInput {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub schedule_description: Option<String>,
    pub price: Decimal,
    pub duration: Option<i32>,
    pub image_url: Option<String>,
    pub min_pax: Option<i32>,
    pub max_pax: Option<i32>,
    pub rating: Option<f32>,
    pub featured: bool,
    pub youtube_url: Option<String>,
    pub images: Option<Vec<String>>,
    pub highlights: Option<Vec<String>>,
    pub included_services: Option<Vec<String>>,
    pub excluded_services: Option<Vec<String>>,
    pub pickup_points: Option<Vec<String>>,
    pub available_guides: Option<Vec<String>>,
    /// Category names; unknown names are created
    pub categories: Option<Vec<String>>,
    pub additional_services: Option<Vec<TourServiceRef>>,
    #[validate(nested)]
    pub pricing_options: Option<Vec<TourPricingInput>>,
}

impl TourInput {
    pub fn attribute(&self, kind: TourAttributeKind) -> Option<&[String]> {
        let values = match kind {
            TourAttributeKind::Image => &self.images,
            TourAttributeKind::Highlight => &self.highlights,
            TourAttributeKind::IncludedService => &self.included_services,
            TourAttributeKind::ExcludedService => &self.excluded_services,
            TourAttributeKind::PickupPoint => &self.pickup_points,
            TourAttributeKind::Guide => &self.available_guides,
        };
        values.as_deref()
    }
}

/// Sortable tour columns for paged listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourSort {
    #[default]
    Id,
    Title,
    Price,
    Rating,
    Duration,
}

impl std::str::FromStr for TourSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(TourSort::Id),
            "title" => Ok(TourSort::Title),
            "price" => Ok(TourSort::Price),
            "rating" => Ok(TourSort::Rating),
            "duration" => Ok(TourSort::Duration),
            other => Err(DomainError::Validation(format!(
                "Unsupported sort field: {}",
                other
            ))),
        }
    }
}

#[async_trait]
pub trait TourRepository: Send + Sync {
    async fn find_page(&self, request: PageRequest, sort: TourSort)
    -> Result<Page<Tour>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Tour>, DomainError>;

    async fn find_featured(&self, request: PageRequest) -> Result<Page<Tour>, DomainError>;

    async fn find_by_category(
        &self,
        category_name: &str,
        request: PageRequest,
    ) -> Result<Page<Tour>, DomainError>;

    /// Case-insensitive match on title or description
    async fn search(&self, query: &str, request: PageRequest) -> Result<Page<Tour>, DomainError>;

    async fn find_top_rated(&self, limit: u64) -> Result<Vec<Tour>, DomainError>;

    async fn create(&self, input: TourInput) -> Result<Tour, DomainError>;

    async fn update(&self, id: i32, input: TourInput) -> Result<Tour, DomainError>;

    /// Conflict while bookings still reference the tour
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn is_service_linked(&self, tour_id: i32, service_id: i32)
    -> Result<bool, DomainError>;

    /// Idempotent
    async fn link_service(&self, tour_id: i32, service_id: i32) -> Result<(), DomainError>;

    /// Returns the number of tours still linked to the service afterwards
    async fn unlink_service(&self, tour_id: i32, service_id: i32) -> Result<u64, DomainError>;
}
