pub mod additional_services;
pub mod auth;
pub mod bookings;
pub mod categories;
pub mod error;
pub mod health;
pub mod payments;
pub mod pricing;
pub mod reviews;
pub mod tours;
pub mod users;

use axum::{
    Router,
    routing::{get, post, put},
};
use serde::Deserialize;

use crate::domain::PageRequest;
use crate::infrastructure::AppState;

/// Common `page`/`size`/`sortBy` query parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub sort_by: Option<String>,
}

impl PageParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/public/health", get(health::health_check))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // Users
        .route("/users", get(users::list_users))
        .route("/users/profile", get(users::get_profile))
        .route("/users/:id", get(users::get_user))
        // Bookings
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/bookings/by-email", get(bookings::list_bookings_by_email))
        .route("/bookings/stats/yearly", get(bookings::yearly_stats))
        .route(
            "/bookings/:id",
            get(bookings::get_booking).delete(bookings::delete_booking),
        )
        .route("/bookings/:id/status", put(bookings::update_booking_status))
        .route("/bookings/:id/cancel", put(bookings::cancel_booking))
        .route(
            "/bookings/:id/confirm-vietqr-payment",
            post(bookings::confirm_vietqr_payment),
        )
        // Payments
        .route("/payments/:id/verify", post(payments::verify_payment))
        // Tours
        .route("/tours", get(tours::list_tours).post(tours::create_tour))
        .route("/tours/featured", get(tours::featured_tours))
        .route("/tours/search", get(tours::search_tours))
        .route("/tours/top-rated", get(tours::top_rated_tours))
        .route("/tours/category/:name", get(tours::tours_by_category))
        .route(
            "/tours/:id",
            get(tours::get_tour)
                .put(tours::update_tour)
                .delete(tours::delete_tour),
        )
        .route("/tours/:id/highlights", get(tours::tour_highlights))
        .route(
            "/tours/:id/included-services",
            get(tours::tour_included_services),
        )
        .route(
            "/tours/:id/excluded-services",
            get(tours::tour_excluded_services),
        )
        .route("/tours/:id/pickup-points", get(tours::tour_pickup_points))
        .route(
            "/tours/:id/additional-services",
            get(tours::tour_additional_services).post(tours::create_tour_service),
        )
        .route(
            "/tours/:id/additional-services/:service_id",
            post(tours::link_tour_service)
                .put(tours::update_tour_service)
                .delete(tours::unlink_tour_service),
        )
        // Categories
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route("/categories/all", get(categories::all_categories))
        .route(
            "/categories/name/:name",
            get(categories::get_category_by_name),
        )
        .route(
            "/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Pricing tiers
        .route(
            "/tour-pricing/tour/:tour_id",
            get(pricing::list_tour_pricing).post(pricing::create_pricing),
        )
        .route(
            "/tour-pricing/tour/:tour_id/round-trip/:round_trip",
            get(pricing::list_tour_pricing_by_trip),
        )
        .route(
            "/tour-pricing/:id",
            get(pricing::get_pricing)
                .put(pricing::update_pricing)
                .delete(pricing::delete_pricing),
        )
        // Additional services
        .route(
            "/additional-services",
            get(additional_services::list_services).post(additional_services::create_service),
        )
        .route(
            "/additional-services/:id",
            get(additional_services::get_service)
                .put(additional_services::update_service)
                .delete(additional_services::delete_service),
        )
        // Reviews
        .route(
            "/tour-reviews/tour/:tour_id",
            get(reviews::list_tour_reviews).post(reviews::create_review),
        )
        .route(
            "/tour-reviews/tour/:tour_id/platform/:platform",
            get(reviews::list_tour_reviews_by_platform),
        )
        .route(
            "/tour-reviews/count/tour/:tour_id",
            get(reviews::count_tour_reviews),
        )
        .route(
            "/tour-reviews/:id",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .with_state(state)
}
