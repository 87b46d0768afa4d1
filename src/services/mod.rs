//! Services Layer
//!
//! Business workflows that span several tables or need an explicit
//! transaction. Handlers call these with the shared database connection.

pub mod booking_service;
pub mod payment_service;
pub mod report_service;
pub mod user_service;
