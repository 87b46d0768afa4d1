//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{
    AdditionalServiceRepository, CategoryRepository, PricingRepository, ReviewRepository,
    TourRepository,
};
use crate::infrastructure::{
    SeaOrmAdditionalServiceRepository, SeaOrmCategoryRepository, SeaOrmPricingRepository,
    SeaOrmReviewRepository, SeaOrmTourRepository,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection, used by the transactional booking services
    db: DatabaseConnection,
    pub tour_repo: Arc<dyn TourRepository>,
    pub category_repo: Arc<dyn CategoryRepository>,
    pub pricing_repo: Arc<dyn PricingRepository>,
    pub service_repo: Arc<dyn AdditionalServiceRepository>,
    pub review_repo: Arc<dyn ReviewRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            tour_repo: Arc::new(SeaOrmTourRepository::new(db.clone())),
            category_repo: Arc::new(SeaOrmCategoryRepository::new(db.clone())),
            pricing_repo: Arc::new(SeaOrmPricingRepository::new(db.clone())),
            service_repo: Arc::new(SeaOrmAdditionalServiceRepository::new(db.clone())),
            review_repo: Arc::new(SeaOrmReviewRepository::new(db.clone())),
            db,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AsRef<DatabaseConnection> for AppState {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Implement FromRef to allow extracting DatabaseConnection from AppState
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
