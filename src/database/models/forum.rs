use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ForumPost {
    pub post_id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row: post plus author display name and reply count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ForumPostSummary {
    pub post_id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: String,
    pub reply_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ForumReply {
    pub reply_id: i32,
    pub post_id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyInput {
    pub content: String,
}
