use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::ExportRecord;
use crate::database::ports::ExportRepository;
use crate::database::transaction::with_transaction;

pub struct PgExportRepository {
    pool: PgPool,
}

impl PgExportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExportRepository for PgExportRepository {
    async fn record_export(&self, user_id: i32, file_name: &str, format: &str) -> Result<ExportRecord, DatabaseError> {
        let file_name = file_name.to_string();
        let format = format.to_string();
        with_transaction(&self.pool, "record_export", move |conn| {
            Box::pin(async move {
                let record = sqlx::query_as::<_, ExportRecord>(
                    "INSERT INTO exporteddocument (user_id, file_name, format, exported_at) \
                     VALUES ($1, $2, $3, NOW()) RETURNING export_id, user_id, file_name, format, exported_at",
                )
                .bind(user_id)
                .bind(&file_name)
                .bind(&format)
                .fetch_one(&mut *conn)
                .await?;
                Ok(record)
            })
        })
        .await
    }

    async fn list_exports(&self, user_id: i32) -> Result<Vec<ExportRecord>, DatabaseError> {
        let records = sqlx::query_as::<_, ExportRecord>(
            "SELECT export_id, user_id, file_name, format, exported_at FROM exporteddocument \
             WHERE user_id = $1 ORDER BY exported_at DESC, export_id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
