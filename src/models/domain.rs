use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Product category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Category with its associated products
///
/// The product collection is derived by join at read time; it is never
/// stored on the category row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithProducts {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub products: Vec<Product>,
}

/// Catalog product
///
/// `category` is populated on reads that join against the categories table
/// and omitted from the wire when absent (products nested inside a category
/// response carry no category of their own).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(rename = "categoryId")]
    pub category_id: i32,
    #[serde(default)]
    pub attributes: Option<Value>,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

/// A single recommendation entry from the language model
///
/// `product_id` arrives as a string and is coerced to the numeric catalog
/// id during the join step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationEntry {
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(rename = "relevanceScore")]
    pub relevance_score: f64,
    pub explanation: String,
}

/// Wire contract with the recommendation service
///
/// No ordering or uniqueness guarantee is enforced on the entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendationEntry>,
}

/// A product augmented with relevance data for one search request
///
/// Ephemeral: built per request and discarded after the response is sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "relevanceScore", skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl SearchResult {
    pub fn new(product: Product, relevance_score: f64, explanation: String) -> Self {
        Self {
            product,
            relevance_score: Some(relevance_score),
            explanation: Some(explanation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_product() -> Product {
        Product {
            id: 1,
            name: "Laptop A".to_string(),
            description: "Budget laptop".to_string(),
            price: 999.0,
            image_url: None,
            category_id: 1,
            attributes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            category: None,
        }
    }

    #[test]
    fn test_product_wire_format_is_camel_case() {
        let json = serde_json::to_value(sample_product()).unwrap();
        assert!(json.get("categoryId").is_some());
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("createdAt").is_some());
        // No category was joined, so the key must be absent entirely
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_search_result_flattens_product_fields() {
        let result = SearchResult::new(sample_product(), 0.9, "Budget-friendly".to_string());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["name"], "Laptop A");
        assert_eq!(json["relevanceScore"], 0.9);
        assert_eq!(json["explanation"], "Budget-friendly");
    }

    #[test]
    fn test_recommendation_response_parses_wire_shape() {
        let raw = r#"{"recommendations":[{"productId":"1","relevanceScore":0.9,"explanation":"Budget-friendly"}]}"#;
        let parsed: RecommendationResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.recommendations.len(), 1);
        assert_eq!(parsed.recommendations[0].product_id, "1");
    }
}
