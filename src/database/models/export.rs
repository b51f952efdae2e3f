use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Audit row written for every generated export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ExportRecord {
    pub export_id: i32,
    pub user_id: i32,
    pub file_name: String,
    pub format: String,
    pub exported_at: DateTime<Utc>,
}
