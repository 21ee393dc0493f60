use crate::models::ErrorResponse;
use crate::routes::AppState;
use crate::services::{AuthUser, IdentityError};
use actix_web::dev::Payload;
use actix_web::http::{header, StatusCode};
use actix_web::{error, web, FromRequest, HttpRequest, HttpResponse};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Why a request failed the bearer-token gate
#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("Authorization header is required")]
    MissingHeader,

    #[error("Bearer token is required")]
    MissingBearer,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Internal server error during authentication")]
    Internal,
}

impl error::ResponseError for AuthRejection {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthRejection::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

/// Bearer-token gate applied ahead of handler logic
///
/// Extracts the `Authorization: Bearer <token>` header and verifies the
/// token with the identity provider on every request; no session state is
/// held locally. Handlers opt in by taking this extractor as a parameter.
pub struct AuthenticatedUser(pub AuthUser);

impl FromRequest for AuthenticatedUser {
    type Error = AuthRejection;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>() else {
                tracing::error!("AppState missing while authenticating request");
                return Err(AuthRejection::Internal);
            };

            let header_value = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .ok_or(AuthRejection::MissingHeader)?;

            let token = header_value
                .strip_prefix("Bearer ")
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .ok_or(AuthRejection::MissingBearer)?;

            match state.identity.get_user(token).await {
                Ok(user) => Ok(AuthenticatedUser(user)),
                Err(IdentityError::InvalidToken) => Err(AuthRejection::InvalidToken),
                Err(e) => {
                    tracing::error!("Token verification failed: {}", e);
                    Err(AuthRejection::Internal)
                }
            }
        })
    }
}
