//! access token (HS256 JWT) 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <jwt>` 以外は 401
//! - 署名不一致 / 期限切れ / 形式不正はすべて同じ 401 (理由は返さない、ログのみ)

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{AuthCtx, TokenCodec};
use crate::state::AppState;

/// 保護対象のルートに認証を掛ける。
///
/// `route_layer` なので、未定義パスは 401 ではなく 404 のまま。
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_ctx = resolve_identity(req.headers(), state.auth.tokens())?;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

/// Scheme is matched case-insensitively (`bearer` and `Bearer` both work).
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

pub fn resolve_identity(headers: &HeaderMap, tokens: &TokenCodec) -> Result<AuthCtx, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthenticated)?;

    let claims = match tokens.decode(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::Unauthenticated);
        }
    };

    Ok(AuthCtx::new(claims.id, claims.sub))
}
