/*
 * Responsibility
 * - posts CRUD
 * - 全クエリが owner_id で絞り込む (他人の投稿は「存在しない」のと同じ扱い)
 * - owner_id は users.id への FK
 */
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub tag: String,
    pub owner_id: i64,
}

/// The owner-mutable part of a post. Updates always overwrite all three fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFields {
    pub title: String,
    pub description: String,
    pub tag: String,
}

pub async fn list_by_owner(conn: &mut SqliteConnection, owner_id: i64) -> RepoResult<Vec<PostRow>> {
    let rows = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT id, title, description, tag, owner_id
        FROM posts
        WHERE owner_id = ?
        ORDER BY id
        "#,
    )
    .bind(owner_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows)
}

pub async fn get_owned(
    conn: &mut SqliteConnection,
    post_id: i64,
    owner_id: i64,
) -> RepoResult<Option<PostRow>> {
    let row = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT id, title, description, tag, owner_id
        FROM posts
        WHERE id = ? AND owner_id = ?
        "#,
    )
    .bind(post_id)
    .bind(owner_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn create(
    conn: &mut SqliteConnection,
    owner_id: i64,
    fields: &PostFields,
) -> RepoResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, description, tag, owner_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(&fields.tag)
    .bind(owner_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Returns `false` when no post with that id belongs to `owner_id`.
pub async fn update_owned(
    conn: &mut SqliteConnection,
    post_id: i64,
    owner_id: i64,
    fields: &PostFields,
) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE posts
        SET
            title = ?,
            description = ?,
            tag = ?
        WHERE id = ? AND owner_id = ?
        "#,
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(&fields.tag)
    .bind(post_id)
    .bind(owner_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_owned(
    conn: &mut SqliteConnection,
    post_id: i64,
    owner_id: i64,
) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM posts
        WHERE id = ? AND owner_id = ?
        "#,
    )
    .bind(post_id)
    .bind(owner_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}
