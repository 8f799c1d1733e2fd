/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - 認証済みリクエストのコンテキスト（AuthCtx）を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は services::auth::identity に置く
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 */

mod core;

pub use crate::services::auth::AuthCtx;
pub use core::AuthCtxExtractor;
