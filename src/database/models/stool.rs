use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StoolEntry {
    pub stool_id: i32,
    pub baby_id: i32,
    pub color: String,
    pub consistency: String,
    pub notes: Option<String>,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoolInput {
    pub color: String,
    pub consistency: String,
    pub notes: Option<String>,
    pub timestamp: NaiveDateTime,
}
