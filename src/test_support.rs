//! Shared fixtures for unit and router tests.

use std::{str::FromStr, sync::Arc, time::Duration};

use axum::Router;
use chrono::Utc;
use sqlx::{
    SqliteConnection, SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::app;
use crate::config::{Config, PasswordHashConfig};
use crate::repos::user_repo;
use crate::services::auth::{AuthCtx, AuthService, PasswordHasher, TokenCodec};
use crate::services::cache::{MemoryCache, PostListCache};
use crate::state::AppState;

pub const TEST_SECRET: &str = "test-secret-test-secret-test-sec";

/// Fresh in-memory database with migrations applied.
///
/// One connection that never idles out: every `sqlite::memory:` connection is
/// its own database, so the pool must keep exactly one alive.
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    app::MIGRATOR.run(&pool).await.unwrap();
    pool
}

pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::new(PasswordHashConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}

pub fn token_codec() -> TokenCodec {
    TokenCodec::new(TEST_SECRET.as_bytes())
}

pub fn auth_service() -> AuthService {
    AuthService::new(fast_hasher(), token_codec(), 300).unwrap()
}

/// Inserts a user row directly (no hashing) and returns its identity.
pub async fn insert_user(conn: &mut SqliteConnection, email: &str) -> AuthCtx {
    let id = user_repo::create(conn, email, "not-a-real-hash")
        .await
        .unwrap();
    AuthCtx::new(id, email)
}

pub async fn app_state() -> AppState {
    let post_lists = PostListCache::new(Arc::new(MemoryCache::new()), Duration::from_secs(300));
    AppState::new(memory_pool().await, Arc::new(auth_service()), post_lists)
}

pub fn config() -> Config {
    Config::from_vars(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        _ => None,
    })
    .unwrap()
}

/// Full router (middleware included) over a fresh in-memory state.
pub async fn app() -> Router {
    app::build_router(app_state().await, &config())
}

/// A token that expired a minute ago.
pub fn expired_token(user_id: i64, email: &str) -> String {
    token_codec()
        .encode_at(
            email,
            user_id,
            Utc::now() - chrono::Duration::minutes(6),
            chrono::Duration::minutes(5),
        )
        .unwrap()
}
