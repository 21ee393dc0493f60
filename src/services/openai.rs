use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Errors that can occur when calling the recommendation service
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Completion contained no message content")]
    MissingContent,
}

/// OpenAI chat-completions client
///
/// Sends a single-message prompt with a directive to respond in JSON and
/// returns the raw message content. The call is single-attempt: no timeout,
/// no retry, the first failure propagates to the caller.
pub struct RecommendationClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl RecommendationClient {
    /// Create a new recommendation client
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        // No request timeout here: the effective timeout on the completion
        // call is whatever the transport imposes
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            model,
            client,
        }
    }

    /// Send a prompt and return the completion's message content
    ///
    /// The request asks for a `json_object` response, so a successful call
    /// yields a JSON-encoded string; parsing it is the caller's concern.
    pub async fn complete_json(&self, prompt: &str) -> Result<String, RecommendationError> {
        let url = format!(
            "{}/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let payload = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "response_format": { "type": "json_object" },
        });

        tracing::debug!("Requesting completion from model {}", self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RecommendationError::ApiError(format!(
                "Completion request failed: {}",
                response.status()
            )));
        }

        let completion: ChatCompletion = response.json().await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(RecommendationError::MissingContent)?;

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_client_creation() {
        let client = RecommendationClient::new(
            "https://api.openai.com/v1".to_string(),
            "test_key".to_string(),
            "gpt-4o-mini".to_string(),
        );

        assert_eq!(client.base_url, "https://api.openai.com/v1");
        assert_eq!(client.model, "gpt-4o-mini");
    }

    #[test]
    fn test_completion_parse_skips_missing_content() {
        let raw = r#"{"choices":[{"message":{"content":null}}]}"#;
        let completion: ChatCompletion = serde_json::from_str(raw).unwrap();
        assert!(completion.choices[0].message.content.is_none());
    }
}
