/*
 * Responsibility
 * - Posts の request/response DTO
 * - create / update は同じ body (3 フィールド全て必須、部分更新なし)
 */
use serde::{Deserialize, Serialize};

use super::{Validate, char_len_within};
use crate::repos::post_repo::{PostFields, PostRow};

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub description: String,
    pub tag: String,
}

impl Validate for PostRequest {
    fn validate(&self) -> Result<(), &'static str> {
        if !char_len_within(&self.title, 5, 50) {
            return Err("title must be 5 to 50 characters");
        }
        if !char_len_within(&self.description, 10, 1000) {
            return Err("description must be 10 to 1000 characters");
        }
        if !char_len_within(&self.tag, 3, 20) {
            return Err("tag must be 3 to 20 characters");
        }
        Ok(())
    }
}

impl From<PostRequest> for PostFields {
    fn from(req: PostRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            tag: req.tag,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub tag: String,
    pub owner_id: i64,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            tag: row.tag,
            owner_id: row.owner_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub id: i64,
}
