use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Coupon {
    pub coupon_id: i32,
    pub code: String,
    pub description: Option<String>,
    pub discount: Option<String>,
    pub expiration_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct QuizQuestion {
    pub question_id: i32,
    pub question: String,
    /// JSON array of answer choices
    pub options: Value,
    pub answer: String,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CuratedTip {
    pub tip_id: i32,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TipFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}
