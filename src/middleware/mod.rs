/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth::access: トークン検証 → AuthCtx
 * - http: request-id / trace / timeout
 */
pub mod auth;
pub mod http;
