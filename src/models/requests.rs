use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// AI-assisted search request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1, message = "Search query is required"))]
    #[serde(default)]
    pub query: String,
}

/// Product fields for create and update
///
/// PUT replaces the full field set, mirroring POST, so both endpoints share
/// this payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0, message = "Price must be non-negative"))]
    pub price: f64,
    #[serde(alias = "image_url", rename = "imageUrl")]
    pub image_url: Option<String>,
    #[serde(alias = "category_id", rename = "categoryId")]
    pub category_id: i32,
    #[serde(default)]
    pub attributes: Option<Value>,
}

/// Category fields for create and update
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryPayload {
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_fails_validation() {
        let request = SearchRequest {
            query: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_missing_query_deserializes_to_empty() {
        let request: SearchRequest = serde_json::from_str("{}").unwrap();
        assert!(request.query.is_empty());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_negative_price_fails_validation() {
        let payload = ProductPayload {
            name: "Laptop".to_string(),
            description: String::new(),
            price: -1.0,
            image_url: None,
            category_id: 1,
            attributes: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_product_payload_accepts_camel_case() {
        let raw = r#"{"name":"Laptop","description":"A laptop","price":999.0,"imageUrl":null,"categoryId":2}"#;
        let payload: ProductPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.category_id, 2);
        assert!(payload.validate().is_ok());
    }
}
