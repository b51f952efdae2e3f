// handlers/protected/forum.rs - /v1/forum/posts, /v1/forum/replies

use axum::{
    extract::{Path, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::extract::{non_blank, parse_id, require, required_text, JsonBody};
use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{ForumPost, ForumPostSummary, ForumReply, PostInput, ReplyInput};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl PostBody {
    fn validate(self) -> Result<PostInput, ApiError> {
        require(&[("title", &self.title), ("content", &self.content)])?;
        Ok(PostInput {
            title: required_text(self.title),
            content: required_text(self.content),
            category: non_blank(self.category),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ReplyBody {
    pub content: Option<String>,
}

impl ReplyBody {
    fn validate(self) -> Result<ReplyInput, ApiError> {
        require(&[("content", &self.content)])?;
        Ok(ReplyInput {
            content: required_text(self.content),
        })
    }
}

/// A post with its replies, oldest reply first
#[derive(Debug, Serialize)]
pub struct PostThread {
    #[serde(flatten)]
    pub post: ForumPost,
    pub replies: Vec<ForumReply>,
}

/// GET /v1/forum/posts
pub async fn list_posts(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Vec<ForumPostSummary>> {
    state.identity.authenticate(&headers).await?;
    let posts = state.repos.forum.list_posts().await?;
    Ok(ApiResponse::success(posts))
}

/// GET /v1/forum/posts/:post_id
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<PostThread> {
    let post_id = parse_id("post_id", &post_id)?;
    state.identity.authenticate(&headers).await?;

    let post = state
        .repos
        .forum
        .get_post(post_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    let replies = state.repos.forum.list_replies(post_id).await?;
    Ok(ApiResponse::success(PostThread { post, replies }))
}

/// POST /v1/forum/posts/add
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<PostBody>,
) -> ApiResult<ForumPost> {
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;

    let post = state.repos.forum.create_post(auth.user_id, input).await?;
    Ok(ApiResponse::success(post).created())
}

/// PUT /v1/forum/posts/:post_id - author only
pub async fn update_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<PostBody>,
) -> ApiResult<ForumPost> {
    let post_id = parse_id("post_id", &post_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_post(post_id, auth.user_id).await?;

    let post = state
        .repos
        .forum
        .update_post(post_id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;
    Ok(ApiResponse::success(post))
}

/// DELETE /v1/forum/posts/:post_id - author only, replies go with it
pub async fn delete_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let post_id = parse_id("post_id", &post_id)?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_post(post_id, auth.user_id).await?;

    if !state.repos.forum.delete_post(post_id).await? {
        return Err(ApiError::not_found("Post not found"));
    }
    Ok(ApiResponse::success(json!({ "message": "Post deleted successfully" })))
}

/// POST /v1/forum/posts/:post_id/replies
pub async fn create_reply(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ReplyBody>,
) -> ApiResult<ForumReply> {
    let post_id = parse_id("post_id", &post_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;

    if !state.repos.forum.post_exists(post_id).await? {
        return Err(ApiError::not_found("Post not found"));
    }
    let reply = state.repos.forum.create_reply(post_id, auth.user_id, input).await?;
    Ok(ApiResponse::success(reply).created())
}

/// PUT /v1/forum/replies/:reply_id - author only
pub async fn update_reply(
    State(state): State<AppState>,
    Path(reply_id): Path<String>,
    headers: HeaderMap,
    JsonBody(body): JsonBody<ReplyBody>,
) -> ApiResult<ForumReply> {
    let reply_id = parse_id("reply_id", &reply_id)?;
    let input = body.validate()?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_reply(reply_id, auth.user_id).await?;

    let reply = state
        .repos
        .forum
        .update_reply(reply_id, input)
        .await?
        .ok_or_else(|| ApiError::not_found("Reply not found"))?;
    Ok(ApiResponse::success(reply))
}

/// DELETE /v1/forum/replies/:reply_id - author only
pub async fn delete_reply(
    State(state): State<AppState>,
    Path(reply_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Value> {
    let reply_id = parse_id("reply_id", &reply_id)?;
    let auth = state.identity.authenticate(&headers).await?;
    state.guard.authorize_reply(reply_id, auth.user_id).await?;

    if !state.repos.forum.delete_reply(reply_id).await? {
        return Err(ApiError::not_found("Reply not found"));
    }
    Ok(ApiResponse::success(json!({ "message": "Reply deleted successfully" })))
}
