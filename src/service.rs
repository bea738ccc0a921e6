//! Authentication Service
//!
//! Core authentication logic: registration, login, profile lookup and
//! password changes, built on the user store, the password hasher and the
//! token issuer.

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::*;
use crate::password::PasswordHasher;
use crate::store::UserStore;
use crate::token::TokenIssuer;

use std::sync::Arc;
use uuid::Uuid;

/// Authentication service
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AuthService {
    /// Create a new authentication service
    ///
    /// Fails if the configuration is invalid.
    pub fn new(store: Arc<dyn UserStore>, config: AuthConfig) -> Result<Self, AuthError> {
        config.validate()?;

        let hasher = PasswordHasher::new(&config)?;
        let tokens = TokenIssuer::new(&config);

        Ok(Self {
            store,
            hasher,
            tokens,
        })
    }

    // ============================================
    // Registration
    // ============================================

    /// Register a new user with the default role
    pub async fn register(&self, req: RegisterRequest) -> Result<User, AuthError> {
        let username = req.username.trim();
        if username.is_empty() {
            return Err(AuthError::validation("Username is required"));
        }
        if req.password.is_empty() {
            return Err(AuthError::validation("Password is required"));
        }

        if self.store.find_by_username(username).await?.is_some() {
            return Err(AuthError::validation("Username already exists"));
        }

        let password_hash = self.hasher.hash_blocking(&req.password).await?;

        let user = self
            .store
            .insert(NewUser {
                username: username.to_string(),
                password_hash,
                role: UserRole::default(),
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    // ============================================
    // Login
    // ============================================

    /// Check credentials and issue a session token
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AuthError> {
        let username = req.username.trim();
        if username.is_empty() {
            return Err(AuthError::validation("Username is required"));
        }

        let user = match self.store.find_by_username(username).await? {
            Some(user) => user,
            None => {
                // Same hashing cost as a wrong password
                self.hasher.verify_dummy_blocking(&req.password).await?;
                tracing::warn!(username = %username, "Login attempt for unknown user");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self
            .hasher
            .verify_blocking(&req.password, &user.password_hash)
            .await?
        {
            tracing::warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.expires_in(),
        })
    }

    // ============================================
    // Token Validation
    // ============================================

    /// Verify a bearer token and return its claims
    pub fn authenticate(&self, token: &str) -> Result<AccessTokenClaims, AuthError> {
        self.tokens.verify(token)
    }

    // ============================================
    // Profile
    // ============================================

    /// Profile of the user identified by a verified token
    pub async fn get_me(&self, user_id: Uuid) -> Result<UserResponse, AuthError> {
        let user = self.store.find_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "Valid token for a user that no longer exists");
            AuthError::Unauthorized
        })?;

        Ok(UserResponse::from(user))
    }

    // ============================================
    // Password Management
    // ============================================

    /// Change password for an authenticated user
    pub async fn change_password(
        &self,
        user_id: Uuid,
        req: ChangePasswordRequest,
    ) -> Result<(), AuthError> {
        if req.old_password.is_empty() {
            return Err(AuthError::validation("Old password is required"));
        }
        if req.new_password.is_empty() {
            return Err(AuthError::validation("New password is required"));
        }

        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !self
            .hasher
            .verify_blocking(&req.old_password, &user.password_hash)
            .await?
        {
            tracing::warn!(user_id = %user.id, "Password change with wrong current password");
            return Err(AuthError::InvalidCredentials);
        }

        let password_hash = self.hasher.hash_blocking(&req.new_password).await?;

        if !self.store.update_password(user.id, &password_hash).await? {
            return Err(AuthError::Unauthorized);
        }

        tracing::info!(user_id = %user.id, "Password changed");

        Ok(())
    }
}
