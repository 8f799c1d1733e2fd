/*
 * Responsibility
 * - SQL アクセス層 (sqlx, sqlite)
 * - 接続は呼び出し側 (request scope) から &mut SqliteConnection で受け取る
 */
pub mod error;
pub mod post_repo;
pub mod user_repo;
