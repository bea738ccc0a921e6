//! Authentication Middleware
//!
//! JWT token validation middleware using real cryptographic verification.

use crate::error::AuthError;
use crate::handlers::AuthState;
use crate::token::bearer_token;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

/// Require authenticated user
///
/// Validates the JWT token from the Authorization header and stores
/// the claims in request extensions for use by extractors.
pub async fn require_auth(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = bearer_token(auth_header)?;
    let claims = auth.authenticate(token)?;

    // Store claims in request extensions for extractors
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
