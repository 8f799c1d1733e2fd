/*
 * Responsibility
 * - 認証済み identity (AuthCtx) を必須引数に取る posts 操作
 * - 所有者不一致と存在しない投稿は同じ NotFound (存在を漏らさない)
 * - 一覧のキャッシュは services::cache::PostListCache 側の責務
 */
use sqlx::SqliteConnection;
use tracing::{debug, info};

use crate::error::AppError;
use crate::repos::post_repo::{self, PostFields, PostRow};
use crate::services::auth::AuthCtx;

const RESOURCE: &str = "post";

pub async fn list(
    identity: &AuthCtx,
    conn: &mut SqliteConnection,
) -> Result<Vec<PostRow>, AppError> {
    let rows = post_repo::list_by_owner(conn, identity.user_id).await?;
    debug!(user_id = identity.user_id, count = rows.len(), "posts listed");
    Ok(rows)
}

pub async fn get(
    identity: &AuthCtx,
    conn: &mut SqliteConnection,
    post_id: i64,
) -> Result<PostRow, AppError> {
    post_repo::get_owned(conn, post_id, identity.user_id)
        .await?
        .ok_or(AppError::not_found(RESOURCE))
}

pub async fn create(
    identity: &AuthCtx,
    conn: &mut SqliteConnection,
    fields: &PostFields,
) -> Result<i64, AppError> {
    let post_id = post_repo::create(conn, identity.user_id, fields).await?;
    info!(user_id = identity.user_id, post_id, "post created");
    Ok(post_id)
}

pub async fn update(
    identity: &AuthCtx,
    conn: &mut SqliteConnection,
    post_id: i64,
    fields: &PostFields,
) -> Result<(), AppError> {
    if !post_repo::update_owned(conn, post_id, identity.user_id, fields).await? {
        return Err(AppError::not_found(RESOURCE));
    }
    info!(user_id = identity.user_id, post_id, "post updated");
    Ok(())
}

pub async fn delete(
    identity: &AuthCtx,
    conn: &mut SqliteConnection,
    post_id: i64,
) -> Result<(), AppError> {
    if !post_repo::delete_owned(conn, post_id, identity.user_id).await? {
        return Err(AppError::not_found(RESOURCE));
    }
    info!(user_id = identity.user_id, post_id, "post deleted");
    Ok(())
}
