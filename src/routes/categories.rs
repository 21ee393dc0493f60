use crate::models::{CategoryPayload, ErrorResponse};
use crate::routes::auth::AuthenticatedUser;
use crate::routes::{catalog_error_response, AppState};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure all category routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/categories")
            .route("", web::get().to(list_categories))
            .route("", web::post().to(create_category))
            .route("/{id}", web::get().to(get_category))
            .route("/{id}", web::put().to(update_category))
            .route("/{id}", web::delete().to(delete_category)),
    );
}

/// Get all categories with their products
///
/// GET /api/categories
async fn list_categories(state: web::Data<AppState>, _user: AuthenticatedUser) -> impl Responder {
    match state.store.list_categories().await {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(e) => catalog_error_response("Error fetching categories", e),
    }
}

/// Get category by ID
///
/// GET /api/categories/{id}
async fn get_category(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> impl Responder {
    let id = path.into_inner();

    match state.store.get_category(id).await {
        Ok(Some(category)) => HttpResponse::Ok().json(category),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new("Category not found")),
        Err(e) => catalog_error_response("Error fetching category", e),
    }
}

/// Create category
///
/// POST /api/categories
async fn create_category(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    payload: web::Json<CategoryPayload>,
) -> impl Responder {
    if let Err(errors) = payload.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(errors.to_string()));
    }

    match state.store.create_category(&payload).await {
        Ok(category) => {
            state.cache.invalidate().await;
            HttpResponse::Created().json(category)
        }
        Err(e) => catalog_error_response("Error creating category", e),
    }
}

/// Update category
///
/// PUT /api/categories/{id}
async fn update_category(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
    payload: web::Json<CategoryPayload>,
) -> impl Responder {
    let id = path.into_inner();

    if let Err(errors) = payload.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(errors.to_string()));
    }

    match state.store.update_category(id, &payload).await {
        Ok(category) => {
            state.cache.invalidate().await;
            HttpResponse::Ok().json(category)
        }
        Err(e) => catalog_error_response("Error updating category", e),
    }
}

/// Delete category
///
/// DELETE /api/categories/{id}
///
/// Refused with 400 while any product still references the category.
async fn delete_category(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    path: web::Path<i32>,
) -> impl Responder {
    let id = path.into_inner();

    match state.store.delete_category(id).await {
        Ok(()) => {
            state.cache.invalidate().await;
            HttpResponse::NoContent().finish()
        }
        Err(e) => catalog_error_response("Error deleting category", e),
    }
}
