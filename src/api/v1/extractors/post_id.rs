/*
 * Responsibility
 * - Path の {post_id} を内部 ID (i64, > 0) として受け取る
 * - 失敗時は 422 (request validation と同じ扱い)
 */
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostId(pub i64);

impl<S> FromRequestParts<S> for PostId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        parse_post_id(&raw).map(PostId)
    }
}

fn parse_post_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::validation("post_id must be a positive integer")),
    }
}
