/*
 * Responsibility
 * - リクエスト単位の DB 接続 (pool から acquire)
 * - handler 終了時に drop → pool へ返却 (成功・失敗どちらの経路でも)
 */
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::{Sqlite, pool::PoolConnection};

use crate::error::AppError;
use crate::state::AppState;

pub struct DbConn(pub PoolConnection<Sqlite>);

impl FromRequestParts<AppState> for DbConn {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        state.db.acquire().await.map(DbConn).map_err(|e| {
            tracing::error!(error = %e, "failed to acquire database connection");
            AppError::Internal
        })
    }
}
