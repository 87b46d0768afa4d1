//! Repository implementations using SeaORM

pub mod additional_service_repository;
pub mod category_repository;
pub mod pricing_repository;
pub mod review_repository;
pub mod tour_repository;

pub use additional_service_repository::SeaOrmAdditionalServiceRepository;
pub use category_repository::SeaOrmCategoryRepository;
pub use pricing_repository::SeaOrmPricingRepository;
pub use review_repository::SeaOrmReviewRepository;
pub use tour_repository::SeaOrmTourRepository;
