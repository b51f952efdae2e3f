use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FeedingSchedule {
    pub feeding_schedule_id: i32,
    pub baby_id: i32,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub meal: String,
    pub amount: Option<String>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub feeding_type: String,
    pub issues: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedingInput {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub meal: String,
    pub amount: Option<String>,
    pub feeding_type: String,
    pub issues: Option<String>,
    pub notes: Option<String>,
}
