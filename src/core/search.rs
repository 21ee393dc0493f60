use crate::core::prompt::build_search_prompt;
use crate::models::{Product, RecommendationResponse, SearchResult};
use crate::services::{RecommendationClient, RecommendationError};
use std::sync::Arc;
use thiserror::Error;

/// Errors produced by the search pipeline
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search query is required")]
    EmptyQuery,

    #[error("Failed to serialize catalog snapshot: {0}")]
    SnapshotError(serde_json::Error),

    #[error("Recommendation request failed: {0}")]
    UpstreamError(#[from] RecommendationError),

    #[error("Failed to parse recommendations: {0}")]
    MalformedResponse(serde_json::Error),
}

/// Search orchestrator
///
/// Turns a free-text shopping query into a ranked, explained subset of the
/// catalog snapshot:
/// 1. Build a prompt embedding the snapshot and the query
/// 2. Request a JSON-constrained completion (single attempt)
/// 3. Parse the completion into the recommendation wire shape
/// 4. Join recommendations back onto snapshot products
///
/// The recommendation client is injected at construction and the snapshot is
/// passed per call; the orchestrator holds no other state and caches nothing
/// across requests.
#[derive(Clone)]
pub struct SearchOrchestrator {
    client: Arc<RecommendationClient>,
}

impl SearchOrchestrator {
    pub fn new(client: Arc<RecommendationClient>) -> Self {
        Self { client }
    }

    /// Run the search pipeline against a catalog snapshot
    ///
    /// An empty or whitespace-only query is rejected before any outbound
    /// call. Every upstream failure propagates as-is: no retry, no partial
    /// result.
    pub async fn search(
        &self,
        query: &str,
        catalog: &[Product],
    ) -> Result<Vec<SearchResult>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let prompt = build_search_prompt(query, catalog).map_err(SearchError::SnapshotError)?;

        let content = self.client.complete_json(&prompt).await?;

        let response: RecommendationResponse =
            serde_json::from_str(&content).map_err(SearchError::MalformedResponse)?;

        tracing::debug!(
            "Model returned {} recommendations for query \"{}\"",
            response.recommendations.len(),
            query
        );

        Ok(merge_recommendations(catalog, response))
    }
}

/// Join recommendation entries back onto the catalog snapshot
///
/// Each entry's productId is coerced from string to the numeric catalog id
/// and looked up in the snapshot. Entries that fail coercion or match no
/// snapshot product are skipped. Matches keep the order the model returned
/// them in; nothing is re-sorted or deduplicated.
pub fn merge_recommendations(
    catalog: &[Product],
    response: RecommendationResponse,
) -> Vec<SearchResult> {
    response
        .recommendations
        .into_iter()
        .filter_map(|entry| {
            let id: i32 = entry.product_id.trim().parse().ok()?;
            let product = catalog.iter().find(|p| p.id == id)?.clone();
            Some(SearchResult::new(
                product,
                entry.relevance_score,
                entry.explanation,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecommendationEntry;
    use chrono::Utc;

    fn sample_product(id: i32, name: &str, price: f64) -> Product {
        Product {
            id,
            name: name.to_string(),
            description: format!("{} description", name),
            price,
            image_url: None,
            category_id: 1,
            attributes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            category: None,
        }
    }

    fn entry(product_id: &str, score: f64, explanation: &str) -> RecommendationEntry {
        RecommendationEntry {
            product_id: product_id.to_string(),
            relevance_score: score,
            explanation: explanation.to_string(),
        }
    }

    #[test]
    fn test_merge_attaches_score_and_explanation() {
        let catalog = vec![
            sample_product(1, "Laptop A", 999.0),
            sample_product(2, "Laptop B", 1299.0),
        ];
        let response = RecommendationResponse {
            recommendations: vec![entry("1", 0.9, "Budget-friendly")],
        };

        let results = merge_recommendations(&catalog, response);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product.id, 1);
        assert_eq!(results[0].relevance_score, Some(0.9));
        assert_eq!(results[0].explanation.as_deref(), Some("Budget-friendly"));
    }

    #[test]
    fn test_merge_skips_unknown_product_ids() {
        let catalog = vec![sample_product(1, "Laptop A", 999.0)];
        let response = RecommendationResponse {
            recommendations: vec![
                entry("99", 0.8, "No such product"),
                entry("1", 0.9, "Budget-friendly"),
            ],
        };

        let results = merge_recommendations(&catalog, response);

        // The unmatched entry is dropped entirely, never emitted with
        // missing fields
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].product.id, 1);
    }

    #[test]
    fn test_merge_skips_non_numeric_product_ids() {
        let catalog = vec![sample_product(1, "Laptop A", 999.0)];
        let response = RecommendationResponse {
            recommendations: vec![entry("laptop-a", 0.8, "Not a number")],
        };

        let results = merge_recommendations(&catalog, response);

        assert!(results.is_empty());
    }

    #[test]
    fn test_merge_preserves_model_order() {
        let catalog = vec![
            sample_product(1, "Laptop A", 999.0),
            sample_product(2, "Laptop B", 1299.0),
            sample_product(3, "Mouse", 25.0),
        ];
        let response = RecommendationResponse {
            recommendations: vec![
                entry("3", 0.5, "Accessory"),
                entry("1", 0.9, "Best match"),
            ],
        };

        let results = merge_recommendations(&catalog, response);

        // Model order, not score order
        assert_eq!(results[0].product.id, 3);
        assert_eq!(results[1].product.id, 1);
    }

    #[test]
    fn test_merge_keeps_duplicate_entries() {
        let catalog = vec![sample_product(1, "Laptop A", 999.0)];
        let response = RecommendationResponse {
            recommendations: vec![
                entry("1", 0.9, "First"),
                entry("1", 0.7, "Second"),
            ],
        };

        let results = merge_recommendations(&catalog, response);

        assert_eq!(results.len(), 2);
    }
}
