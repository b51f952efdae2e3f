use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Milestone {
    pub milestone_id: i32,
    pub baby_id: i32,
    pub date: NaiveDate,
    pub title: String,
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneInput {
    pub date: NaiveDate,
    pub title: String,
    pub details: Option<String>,
}
