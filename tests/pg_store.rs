//! PostgreSQL user store tests.
//!
//! Require a reachable database via `DATABASE_URL`:
//! `cargo test --test pg_store -- --ignored`

use student_bank_auth::{
    AuthError, DatabaseConfig, NewUser, PgUserStore, UserRole, UserStore,
};
use uuid::Uuid;

async fn store() -> PgUserStore {
    let config = DatabaseConfig::from_env().expect("database config");
    let store = PgUserStore::connect(&config)
        .await
        .expect("Failed to connect to database");
    store.run_migrations().await.expect("migrations");
    store
}

fn unique_username() -> String {
    format!("test_{}", Uuid::new_v4().simple())
}

#[tokio::test]
#[ignore]
async fn test_pg_insert_and_find() {
    let store = store().await;
    let username = unique_username();

    let user = store
        .insert(NewUser {
            username: username.clone(),
            password_hash: "hash".into(),
            role: UserRole::User,
        })
        .await
        .unwrap();

    let found = store.find_by_username(&username).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.role, UserRole::User);
    assert!(store.find_by_id(user.id).await.unwrap().is_some());
}

#[tokio::test]
#[ignore]
async fn test_pg_unique_violation_is_validation_error() {
    let store = store().await;
    let username = unique_username();
    let new_user = || NewUser {
        username: username.clone(),
        password_hash: "hash".into(),
        role: UserRole::User,
    };

    store.insert(new_user()).await.unwrap();
    let err = store.insert(new_user()).await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
}

#[tokio::test]
#[ignore]
async fn test_pg_update_password() {
    let store = store().await;
    let user = store
        .insert(NewUser {
            username: unique_username(),
            password_hash: "old".into(),
            role: UserRole::User,
        })
        .await
        .unwrap();

    assert!(store.update_password(user.id, "new").await.unwrap());
    let stored = store.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(stored.password_hash, "new");

    assert!(!store.update_password(Uuid::new_v4(), "x").await.unwrap());
}
