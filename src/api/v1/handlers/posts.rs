/*
 * Responsibility
 * - /posts 系 CRUD handler
 * - AuthCtx (middleware が検証済み) を必ず services に渡す
 * - create/update は PayloadWithinLimit → ValidatedJson の順 (サイズ超過を field validation より先に弾く)
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::posts::{CreatedResponse, PostRequest, PostResponse},
        extractors::{AuthCtxExtractor, DbConn, PayloadWithinLimit, PostId, ValidatedJson},
    },
    error::AppError,
    services::posts,
    state::AppState,
};

pub async fn list_posts(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    DbConn(mut conn): DbConn,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let rows = state.post_lists.list(&ctx, &mut conn).await?;
    Ok(Json(rows.into_iter().map(PostResponse::from).collect()))
}

pub async fn get_post(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    PostId(post_id): PostId,
    DbConn(mut conn): DbConn,
) -> Result<Json<PostResponse>, AppError> {
    let row = posts::get(&ctx, &mut conn, post_id).await?;
    Ok(Json(row.into()))
}

pub async fn create_post(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    _limit: PayloadWithinLimit,
    DbConn(mut conn): DbConn,
    ValidatedJson(req): ValidatedJson<PostRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let id = posts::create(&ctx, &mut conn, &req.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Post created successfully",
            id,
        }),
    ))
}

pub async fn update_post(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    _limit: PayloadWithinLimit,
    PostId(post_id): PostId,
    DbConn(mut conn): DbConn,
    ValidatedJson(req): ValidatedJson<PostRequest>,
) -> Result<StatusCode, AppError> {
    posts::update(&ctx, &mut conn, post_id, &req.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_post(
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    PostId(post_id): PostId,
    DbConn(mut conn): DbConn,
) -> Result<StatusCode, AppError> {
    posts::delete(&ctx, &mut conn, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
