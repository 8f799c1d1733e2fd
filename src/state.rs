/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: SqlitePool, auth: AuthService, post_lists: 一覧キャッシュ
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::{auth::AuthService, cache::PostListCache};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub auth: Arc<AuthService>,
    pub post_lists: PostListCache,
}

impl AppState {
    pub fn new(db: sqlx::SqlitePool, auth: Arc<AuthService>, post_lists: PostListCache) -> Self {
        Self {
            db,
            auth,
            post_lists,
        }
    }
}
