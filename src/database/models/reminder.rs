use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Reminder {
    pub reminder_id: i32,
    pub baby_id: i32,
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderInput {
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub notes: Option<String>,
}
