// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Category, CategoryWithProducts, Product, RecommendationEntry, RecommendationResponse,
    SearchResult,
};
pub use requests::{CategoryPayload, ProductPayload, SearchRequest};
pub use responses::{ErrorResponse, HealthResponse};
