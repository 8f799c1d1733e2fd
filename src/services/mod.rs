/*
 * Responsibility
 * - auth: パスワード / トークン / signup・login
 * - cache: 一覧キャッシュとそのバックエンド
 * - posts: 所有者スコープの posts 操作
 */
pub mod auth;
pub mod cache;
pub mod posts;
