/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - users は signup 後 immutable (update/delete は提供しない)
 * - email の UNIQUE 制約違反は RepoError::Conflict に変換
 */
use std::fmt;

use sqlx::{FromRow, SqliteConnection};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

impl fmt::Debug for UserRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRow")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

// Exact, case-sensitive match on the stored value.
pub async fn find_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, password_hash
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

pub async fn create(
    conn: &mut SqliteConnection,
    email: &str,
    password_hash: &str,
) -> RepoResult<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (email, password_hash)
        VALUES (?, ?)
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .execute(&mut *conn)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(result.last_insert_rowid())
}
