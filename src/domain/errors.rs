//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Referenced entity does not exist
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: String },
    /// Duplicate-keyed entity
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Malformed input
    #[error("Validation error: {0}")]
    Validation(String),
    /// Missing or invalid credential
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Credential lacks the required role
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// Database/persistence error
    #[error("Database error: {0}")]
    Database(String),
    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}
