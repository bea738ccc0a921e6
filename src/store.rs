//! User Store
//!
//! Persistence for user records. [`PgUserStore`] is the production store
//! backed by PostgreSQL; [`MemoryUserStore`] keeps users in process memory.

use crate::config::DatabaseConfig;
use crate::error::AuthError;
use crate::models::{NewUser, User};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

const USERNAME_TAKEN: &str = "Username already exists";

/// Credential store used by the auth service
///
/// Implementations must enforce username uniqueness in `insert`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Get user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;

    /// Get user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError>;

    /// Insert a new user, failing with a validation error if the username is taken
    async fn insert(&self, user: NewUser) -> Result<User, AuthError>;

    /// Replace a user's password hash. Returns `false` if no user matched.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, AuthError>;
}

// ============================================
// PostgreSQL
// ============================================

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Open a connection pool using the given settings
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AuthError> {
        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        Ok(Self::new(db))
    }

    /// Create the user table and its role type if they do not exist
    pub async fn run_migrations(&self) -> Result<(), AuthError> {
        tracing::info!("Running user store migrations");

        sqlx::query(
            r#"
            DO $$ BEGIN
                CREATE TYPE user_role AS ENUM ('user', 'admin');
            EXCEPTION
                WHEN duplicate_object THEN null;
            END $$;
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                username VARCHAR(100) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                role user_role NOT NULL DEFAULT 'user',
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            "#,
        )
        .execute(&self.db)
        .await?;

        tracing::info!("User store migrations completed");
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.db)
        .await
        .map_err(|err| match &err {
            // Lost a registration race against the unique constraint
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AuthError::validation(USERNAME_TAKEN)
            }
            _ => AuthError::from(err),
        })
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, AuthError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(password_hash)
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================
// In-memory
// ============================================

/// Process-local user store
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, AuthError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(AuthError::validation(USERNAME_TAKEN));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<bool, AuthError> {
        let mut users = self.users.write().await;

        match users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryUserStore::new();
        let user = store.insert(new_user("carol")).await.unwrap();

        let by_id = store.find_by_id(user.id).await.unwrap().unwrap();
        let by_name = store.find_by_username("carol").await.unwrap().unwrap();
        assert_eq!(by_id.id, user.id);
        assert_eq!(by_name.id, user.id);
        assert!(store.find_by_username("dave").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryUserStore::new();
        store.insert(new_user("carol")).await.unwrap();

        let err = store.insert(new_user("carol")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_password() {
        let store = MemoryUserStore::new();
        let user = store.insert(new_user("carol")).await.unwrap();

        assert!(store.update_password(user.id, "new-hash").await.unwrap());
        let stored = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "new-hash");
        assert!(stored.updated_at >= user.updated_at);

        assert!(!store.update_password(Uuid::new_v4(), "x").await.unwrap());
    }
}
