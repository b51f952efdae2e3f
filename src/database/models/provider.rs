use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ChildProvider {
    pub provider_id: i32,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub capacity: Option<i32>,
    pub ages_served: Option<String>,
}

/// Provider row joined with the moment the user favorited it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FavoriteProvider {
    pub provider_id: i32,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub capacity: Option<i32>,
    pub ages_served: Option<String>,
    pub favorited_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderFilter {
    pub city: Option<String>,
    pub search: Option<String>,
}
