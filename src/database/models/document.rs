use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A health document a parent shared with a doctor for one baby
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SharedDocument {
    pub document_id: i32,
    pub baby_id: i32,
    pub doctor_id: i32,
    pub document_name: String,
    pub document_url: String,
    pub shared_by: i32,
    pub shared_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSharedDocument {
    pub doctor_id: i32,
    pub document_name: String,
    pub document_url: String,
}
