use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Baby {
    pub baby_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birthdate: NaiveDate,
    pub weight: Option<f64>,
    pub height: Option<f64>,
}

impl Baby {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BabyInput {
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birthdate: NaiveDate,
    pub weight: Option<f64>,
    pub height: Option<f64>,
}
