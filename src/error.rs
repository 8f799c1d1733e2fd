/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError / 認証エラー / validation error を統一的に変換
 *
 * Notes
 * - InvalidCredentials は「ユーザーなし」と「パスワード不一致」を区別しない
 * - NotFound は「存在しない」と「他人の投稿」を区別しない
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("could not validate credentials")]
    Unauthenticated,
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("payload oversize")]
    PayloadTooLarge,
    #[error("service unavailable - something went wrong with token")]
    TokenIssuance,
    #[error("{0}")]
    Validation(String),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::EmailTaken | AppError::PayloadTooLarge => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::TokenIssuance => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::EmailTaken => "EMAIL_TAKEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            AppError::TokenIssuance => "SERVICE_UNAVAILABLE",
            AppError::Validation(_) => "VALIDATION_FAILED",
            AppError::Internal => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.to_string(),
            },
        };

        let mut response = (status, Json(body)).into_response();
        if matches!(self, AppError::Unauthenticated) {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        // Conflict carries meaning only at call sites that expect it (signup).
        tracing::error!(error = %e, "repository failure");
        AppError::Internal
    }
}
