//! Authentication Extractors
//!
//! Axum extractors for the authenticated caller and validated JSON bodies.

use crate::error::AuthError;
use crate::models::AccessTokenClaims;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

/// Authenticated user information extracted from JWT claims
///
/// Only available on routes behind [`crate::middleware::require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

impl AuthUser {
    /// Create user from JWT claims
    pub fn from_claims(claims: &AccessTokenClaims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username.clone(),
            role: claims.role.clone(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AccessTokenClaims>()
            .map(AuthUser::from_claims)
            .ok_or(AuthError::Unauthorized)
    }
}

/// JSON body that has been deserialized and passed `validator` checks
///
/// Malformed JSON and failed validation are both reported as
/// [`AuthError::Validation`] (HTTP 400).
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "JSON body rejected");
            AuthError::Validation(e.body_text())
        })?;

        value.validate().map_err(|e| {
            tracing::debug!(error = %e, "Request validation failed");
            AuthError::Validation(e.to_string())
        })?;

        Ok(ValidatedJson(value))
    }
}
