use crate::models::Product;

/// Build the search instruction sent to the language model
///
/// Embeds the full catalog snapshot as pretty-printed JSON together with the
/// literal user query, and spells out the required response shape: an array
/// of entries carrying a product identifier, a relevance score in [0,1], and
/// an explanation string.
pub fn build_search_prompt(query: &str, catalog: &[Product]) -> serde_json::Result<String> {
    let catalog_json = serde_json::to_string_pretty(catalog)?;

    Ok(format!(
        r#"Based on the following user query: "{query}"
And the following product catalog:
{catalog_json}

Please recommend the most relevant products and explain why they match the user's needs.
Return the response in the following JSON format:
{{
  "recommendations": [
    {{
      "productId": "string",
      "relevanceScore": number (0-1),
      "explanation": "string"
    }}
  ]
}}"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn test_prompt_embeds_query_and_catalog() {
        let catalog = vec![
            sample_product(1, "Laptop A", 999.0),
            sample_product(2, "Laptop B", 1299.0),
        ];

        let prompt = build_search_prompt("cheap laptop for school", &catalog).unwrap();

        assert!(prompt.contains("cheap laptop for school"));
        assert!(prompt.contains("Laptop A"));
        assert!(prompt.contains("Laptop B"));
    }

    #[test]
    fn test_prompt_specifies_response_shape() {
        let prompt = build_search_prompt("anything", &[]).unwrap();

        assert!(prompt.contains("\"recommendations\""));
        assert!(prompt.contains("\"productId\""));
        assert!(prompt.contains("\"relevanceScore\""));
        assert!(prompt.contains("\"explanation\""));
    }
}
