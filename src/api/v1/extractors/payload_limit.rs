/*
 * Responsibility
 * - 宣言された Content-Length による早期の受付制御 (body を読む前)
 * - body extractor (ValidatedJson) より前に置くことで、field validation より先に弾く
 *
 * Notes
 * - Content-Length なし (chunked 等) は DefaultBodyLimit 側で上限を掛ける
 */
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::error::AppError;

/// 1 MiB
pub const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct PayloadWithinLimit;

impl<S> FromRequestParts<S> for PayloadWithinLimit
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        check_declared_length(parts)?;
        Ok(Self)
    }
}

fn check_declared_length(parts: &Parts) -> Result<(), AppError> {
    let Some(raw) = parts.headers.get(header::CONTENT_LENGTH) else {
        return Ok(());
    };

    let declared = raw
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .ok_or_else(|| AppError::validation("invalid content-length"))?;

    if declared > MAX_PAYLOAD_BYTES as u64 {
        tracing::warn!(declared, limit = MAX_PAYLOAD_BYTES, "payload rejected");
        return Err(AppError::PayloadTooLarge);
    }
    Ok(())
}
