// Route exports
pub mod auth;
pub mod categories;
pub mod products;

use crate::core::SearchOrchestrator;
use crate::models::{ErrorResponse, HealthResponse};
use crate::services::{CatalogCache, CatalogError, CatalogStore, IdentityClient};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CatalogStore>,
    pub identity: Arc<IdentityClient>,
    pub cache: Arc<CatalogCache>,
    pub search: SearchOrchestrator,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api")
            .configure(products::configure)
            .configure(categories::configure),
    );
}

/// Health check endpoint (unauthenticated)
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Map a catalog store failure to its HTTP response
pub(crate) fn catalog_error_response(context: &str, err: CatalogError) -> HttpResponse {
    match err {
        CatalogError::NotFound(message) => {
            HttpResponse::NotFound().json(ErrorResponse::new(message))
        }
        CatalogError::Conflict(message) => {
            HttpResponse::BadRequest().json(ErrorResponse::new(message))
        }
        other => {
            tracing::error!("{}: {}", context, other);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Internal server error"))
        }
    }
}
