use axum::{Json, extract::State};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use crate::services::user_service;

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service status with database connectivity")
    )
)]
pub async fn health_check(State(db): State<DatabaseConnection>) -> Json<Value> {
    match user_service::count_users(&db).await {
        Ok(user_count) => Json(json!({
            "status": "UP",
            "service": "meetup-travel",
            "version": env!("CARGO_PKG_VERSION"),
            "database": "Connected",
            "userCount": user_count
        })),
        Err(e) => {
            tracing::error!("Health check database probe failed: {}", e);
            Json(json!({
                "status": "DOWN",
                "service": "meetup-travel",
                "version": env!("CARGO_PKG_VERSION"),
                "database": "Disconnected"
            }))
        }
    }
}
