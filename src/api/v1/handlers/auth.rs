/*
 * Responsibility
 * - /auth/signup, /auth/login handler
 * - DTO validation は extractor 済み。ここでは AuthService を呼んで DTO に詰めるだけ
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::auth::{LoginForm, MessageResponse, SignupRequest, TokenResponse},
        extractors::{DbConn, ValidatedForm, ValidatedJson},
    },
    error::AppError,
    state::AppState,
};

pub async fn signup(
    State(state): State<AppState>,
    DbConn(mut conn): DbConn,
    ValidatedJson(req): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    state.auth.signup(&mut conn, &req.email, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully",
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    DbConn(mut conn): DbConn,
    ValidatedForm(form): ValidatedForm<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let issued = state
        .auth
        .login(&mut conn, &form.username, &form.password)
        .await?;

    Ok(Json(TokenResponse {
        access_token: issued.access_token,
        token_type: issued.token_type,
        expires_in: issued.expires_in,
    }))
}
