//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no SeaORM entities, no Axum).
//! Only domain types, repository trait definitions, pure pricing/reporting
//! logic and domain error types. Write models carry their `validator` rules.

pub mod booking;
pub mod errors;
pub mod report;
pub mod repositories;
pub mod values;

pub use booking::*;
pub use errors::DomainError;
pub use report::YearlyStats;
pub use repositories::*;
