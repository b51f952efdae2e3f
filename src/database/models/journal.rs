use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub entry_id: i32,
    pub user_id: i32,
    pub title: Option<String>,
    pub content: String,
    pub category: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalInput {
    pub title: Option<String>,
    pub content: String,
    pub category: Option<String>,
    pub date: NaiveDate,
}
