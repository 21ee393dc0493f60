use crate::core::SearchError;
use crate::models::{ErrorResponse, Product, ProductPayload, SearchRequest};
use crate::routes::auth::AuthenticatedUser;
use crate::routes::{catalog_error_response, AppState};
use crate::services::CatalogError;
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Configure all product routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::get().to(list_products))
            .route("", web::post().to(create_product))
            .route("/search", web::post().to(search_products))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product)),
    );
}

/// Read the full catalog snapshot, preferring the cache
///
/// Writes invalidate the cache, so a hit is always a current snapshot.
async fn catalog_snapshot(state: &AppState) -> Result<Arc<Vec<Product>>, CatalogError> {
    if let Some(snapshot) = state.cache.get_snapshot().await {
        return Ok(snapshot);
    }

    let snapshot = Arc::new(state.store.list_products().await?);
    state.cache.set_snapshot(snapshot.clone()).await;

    Ok(snapshot)
}

/// Get all products
///
/// GET /api/products
async fn list_products(state: web::Data<AppState>, _user: AuthenticatedUser) -> impl Responder {
    match catalog_snapshot(&state).await {
        Ok(products) => HttpResponse::Ok().json(products.as_ref()),
        Err(e) => catalog_error_response("Error fetching products", e),
    }
}

/// Get product by ID
///
/// GET /api/products/{id}
async fn get_product(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> impl Responder {
    let id = path.into_inner();

    match state.store.get_product(id).await {
        Ok(Some(product)) => HttpResponse::Ok().json(product),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new("Product not found")),
        Err(e) => catalog_error_response("Error fetching product", e),
    }
}

/// AI-powered product search
///
/// POST /api/products/search
///
/// Request body:
/// ```json
/// { "query": "cheap laptop for school" }
/// ```
///
/// Returns the recommended products in model order, each carrying a
/// relevance score and an explanation.
async fn search_products(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    req: web::Json<SearchRequest>,
) -> impl Responder {
    if req.validate().is_err() {
        tracing::info!("Rejected search request with empty query");
        return HttpResponse::BadRequest().json(ErrorResponse::new("Search query is required"));
    }

    // Snapshot the catalog before any outbound call; the join step resolves
    // recommendations against exactly this snapshot
    let snapshot = match catalog_snapshot(&state).await {
        Ok(snapshot) => snapshot,
        Err(e) => return catalog_error_response("Error fetching products for search", e),
    };

    tracing::info!(
        "Searching {} products for query \"{}\"",
        snapshot.len(),
        req.query.trim()
    );

    match state.search.search(&req.query, &snapshot).await {
        Ok(results) => {
            tracing::info!("Returning {} search results", results.len());
            HttpResponse::Ok().json(results)
        }
        Err(SearchError::EmptyQuery) => {
            HttpResponse::BadRequest().json(ErrorResponse::new("Search query is required"))
        }
        Err(e @ (SearchError::UpstreamError(_) | SearchError::MalformedResponse(_))) => {
            tracing::error!("Error in product search: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::new("Failed to get AI recommendations"))
        }
        Err(e) => {
            tracing::error!("Error in product search: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Internal server error"))
        }
    }
}

/// Create product
///
/// POST /api/products
async fn create_product(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    payload: web::Json<ProductPayload>,
) -> impl Responder {
    if let Err(errors) = payload.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(errors.to_string()));
    }

    match state.store.create_product(&payload).await {
        Ok(product) => {
            state.cache.invalidate().await;
            HttpResponse::Created().json(product)
        }
        Err(e) => catalog_error_response("Error creating product", e),
    }
}

/// Update product
///
/// PUT /api/products/{id}
async fn update_product(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
    payload: web::Json<ProductPayload>,
) -> impl Responder {
    let id = path.into_inner();

    if let Err(errors) = payload.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(errors.to_string()));
    }

    match state.store.update_product(id, &payload).await {
        Ok(product) => {
            state.cache.invalidate().await;
            HttpResponse::Ok().json(product)
        }
        Err(e) => catalog_error_response("Error updating product", e),
    }
}

/// Delete product
///
/// DELETE /api/products/{id}
async fn delete_product(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> impl Responder {
    let id = path.into_inner();

    match state.store.delete_product(id).await {
        Ok(()) => {
            state.cache.invalidate().await;
            HttpResponse::NoContent().finish()
        }
        Err(e) => catalog_error_response("Error deleting product", e),
    }
}
