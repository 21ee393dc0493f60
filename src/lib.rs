//! Smart Catalog - AI-assisted product catalog service
//!
//! This library provides the catalog CRUD services and the AI-powered search
//! pipeline used by the Smart Product Assistant backend. Search turns a
//! free-text shopping query into a ranked, explained subset of the catalog by
//! asking a hosted language model to score the full catalog snapshot.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{build_search_prompt, merge_recommendations, SearchError, SearchOrchestrator};
pub use crate::models::{
    Category, CategoryWithProducts, Product, RecommendationEntry, RecommendationResponse,
    SearchRequest, SearchResult,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let prompt = build_search_prompt("running shoes", &[]).unwrap();
        assert!(prompt.contains("running shoes"));
    }
}
