//! Routers de la API
//!
//! Cada recurso define su propio router; create_router los ensambla
//! con el middleware global.

pub mod admin_record_routes;
pub mod auth_routes;
pub mod image_routes;
pub mod record_routes;

use axum::{routing::get, Json, Router};
use serde_json::json;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Ensamblar el router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth_routes::create_auth_router())
        .nest("/records", record_routes::create_record_router())
        .nest(
            "/admin/records",
            admin_record_routes::create_admin_record_router(state.clone()),
        )
        .nest("/images", image_routes::create_image_router())
        .layer(cors_middleware())
        .with_state(state)
}

/// Health check simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
