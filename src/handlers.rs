//! Authentication HTTP Handlers
//!
//! REST API endpoints for authentication operations.

use crate::error::AuthError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::middleware;
use crate::models::*;
use crate::service::AuthService;

use axum::{
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared auth service state
pub type AuthState = Arc<AuthService>;

// ============================================
// Route Builder
// ============================================

/// Create authentication routes
pub fn create_routes(auth_service: Arc<AuthService>) -> Router {
    // Public routes (no authentication required)
    let public = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/auth/me", get(get_current_user))
        .route("/auth/change-password", post(change_password))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_service.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(auth_service)
}

/// Authentication routes mounted under `/api`
pub fn api_router(auth_service: Arc<AuthService>) -> Router {
    Router::new().nest("/api", create_routes(auth_service))
}

// ============================================
// Registration
// ============================================

/// POST /auth/register
///
/// Register a new user account
pub async fn register(
    State(auth): State<AuthState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let user = auth.register(req).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

// ============================================
// Login
// ============================================

/// POST /auth/login
///
/// Authenticate user and return a session token
pub async fn login(
    State(auth): State<AuthState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let response = auth.login(req).await?;

    Ok(Json(response))
}

// ============================================
// Current User
// ============================================

/// GET /auth/me
///
/// Get current user profile
pub async fn get_current_user(
    State(auth): State<AuthState>,
    user: AuthUser,
) -> Result<Json<UserResponse>, AuthError> {
    let profile = auth.get_me(user.id).await?;

    Ok(Json(profile))
}

// ============================================
// Password Management
// ============================================

/// POST /auth/change-password
///
/// Change password for authenticated user
pub async fn change_password(
    State(auth): State<AuthState>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<StatusCode, AuthError> {
    auth.change_password(user.id, req).await?;

    Ok(StatusCode::NO_CONTENT)
}
