pub mod additional_service;
pub mod booking;
pub mod booking_additional_service;
pub mod booking_pricing_option;
pub mod category;
pub mod payment;
pub mod tour;
pub mod tour_additional_service;
pub mod tour_attribute;
pub mod tour_category;
pub mod tour_pricing;
pub mod tour_review;
pub mod user;
