use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when verifying a token with the identity provider
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Identity service error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Authenticated user as reported by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Supabase-style identity client
///
/// Verifies bearer tokens by asking the identity provider for the user they
/// belong to. No session state is held locally; every request is verified
/// upstream.
pub struct IdentityClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl IdentityClient {
    /// Create a new identity client
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            client,
        }
    }

    /// Resolve a bearer token to the user it belongs to
    pub async fn get_user(&self, token: &str) -> Result<AuthUser, IdentityError> {
        let url = format!("{}/auth/v1/user", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(IdentityError::InvalidToken);
        }

        if !status.is_success() {
            return Err(IdentityError::ApiError(format!(
                "Token verification failed: {}",
                status
            )));
        }

        response
            .json::<AuthUser>()
            .await
            .map_err(|e| IdentityError::InvalidResponse(format!("Failed to parse user: {}", e)))
    }
}
