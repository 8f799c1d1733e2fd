/*
 * Responsibility
 * - JSON body の decode + DTO の validate() を handler 前に実行する
 * - 形式不正・制約違反はどちらも 422 (AppError::Validation)
 */
use axum::{
    Form, Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::api::v1::dto::Validate;
use crate::error::AppError;

pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        value.validate().map_err(AppError::validation)?;
        Ok(Self(value))
    }
}

/// Same contract for `application/x-www-form-urlencoded` bodies (OAuth2 password form).
pub struct ValidatedForm<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        value.validate().map_err(AppError::validation)?;
        Ok(Self(value))
    }
}
