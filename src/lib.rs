//! Student Bank Authentication API
//!
//! Authentication backend for the Student Bank application providing:
//! - User registration and login
//! - Stateless JWT session tokens
//! - Argon2id password hashing
//! - Current-user lookup and password change
//! - PostgreSQL and in-memory user stores
//!
//! # Configuration
//!
//! All configuration is loaded from environment variables:
//! - `JWT_SECRET` - Secret key for signing JWTs (required, min 32 chars)
//! - `JWT_EXPIRATION` - Token expiration in seconds (default: 3600)
//! - `JWT_ISSUER` - JWT issuer claim (default: "student-bank")
//! - `JWT_AUDIENCE` - JWT audience claim (default: "student-bank-api")
//! - `ARGON2_MEMORY_COST`, `ARGON2_TIME_COST`, `ARGON2_PARALLELISM` - hashing costs
//! - `DATABASE_URL` - PostgreSQL connection string, or `DB_HOST`, `DB_PORT`,
//!   `DB_USERNAME`, `DB_PASSWORD`, `DB_DATABASE` to assemble one
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use student_bank_auth::{AuthConfig, AuthService, DatabaseConfig, PgUserStore};
//!
//! let store = PgUserStore::connect(&DatabaseConfig::from_env()?).await?;
//! store.run_migrations().await?;
//!
//! let auth = Arc::new(AuthService::new(Arc::new(store), AuthConfig::from_env()?)?);
//! let app = student_bank_auth::api_router(auth);
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod store;
pub mod token;

// Re-export commonly used types
pub use config::{AuthConfig, DatabaseConfig};
pub use error::AuthError;
pub use extractors::{AuthUser, ValidatedJson};
pub use handlers::{api_router, create_routes, AuthState};
pub use models::*;
pub use password::PasswordHasher;
pub use service::AuthService;
pub use store::{MemoryUserStore, PgUserStore, UserStore};
pub use token::TokenIssuer;
