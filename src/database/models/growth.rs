use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Growth {
    pub growth_id: i32,
    pub baby_id: i32,
    pub date: NaiveDate,
    pub height: f64,
    pub weight: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GrowthInput {
    pub date: NaiveDate,
    pub height: f64,
    pub weight: f64,
    pub notes: Option<String>,
}
