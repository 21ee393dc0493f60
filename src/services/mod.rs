// Service exports
pub mod cache;
pub mod identity;
pub mod openai;
pub mod postgres;

pub use cache::{CacheKey, CatalogCache};
pub use identity::{AuthUser, IdentityClient, IdentityError};
pub use openai::{RecommendationClient, RecommendationError};
pub use postgres::{CatalogError, CatalogStore};
