use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewSharedDocument, SharedDocument};
use crate::database::ports::DocumentRepository;
use crate::database::transaction::with_transaction;

const DOCUMENT_COLUMNS: &str =
    "document_id, baby_id, doctor_id, document_name, document_url, shared_by, shared_at";

pub struct PgDocumentRepository {
    pool: PgPool,
}

impl PgDocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn list_for_baby(&self, baby_id: i32) -> Result<Vec<SharedDocument>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM sharing_health_documents_baby_doctor WHERE baby_id = $1 \
             ORDER BY shared_at DESC, document_id DESC",
            DOCUMENT_COLUMNS
        );
        let docs = sqlx::query_as::<_, SharedDocument>(&sql)
            .bind(baby_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(docs)
    }

    async fn share(&self, baby_id: i32, shared_by: i32, input: NewSharedDocument) -> Result<SharedDocument, DatabaseError> {
        let sql = format!(
            "INSERT INTO sharing_health_documents_baby_doctor \
             (baby_id, doctor_id, document_name, document_url, shared_by, shared_at) \
             VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING {}",
            DOCUMENT_COLUMNS
        );
        with_transaction(&self.pool, "share_document", move |conn| {
            Box::pin(async move {
                sqlx::query(
                    "INSERT INTO doctor_baby (doctor_id, baby_id) VALUES ($1, $2) \
                     ON CONFLICT (doctor_id, baby_id) DO NOTHING",
                )
                .bind(input.doctor_id)
                .bind(baby_id)
                .execute(&mut *conn)
                .await?;

                let doc = sqlx::query_as::<_, SharedDocument>(&sql)
                    .bind(baby_id)
                    .bind(input.doctor_id)
                    .bind(&input.document_name)
                    .bind(&input.document_url)
                    .bind(shared_by)
                    .fetch_one(&mut *conn)
                    .await?;
                Ok(doc)
            })
        })
        .await
    }

    async fn delete(&self, baby_id: i32, document_id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM sharing_health_documents_baby_doctor WHERE document_id = $1 AND baby_id = $2",
        )
        .bind(document_id)
        .bind(baby_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_doctor(&self, doctor_id: i32) -> Result<Vec<SharedDocument>, DatabaseError> {
        let rows = sqlx::query_as::<_, SharedDocument>(
            "SELECT s.document_id, s.baby_id, s.doctor_id, s.document_name, s.document_url, \
             s.shared_by, s.shared_at \
             FROM sharing_health_documents_baby_doctor s \
             JOIN doctor_baby db ON db.baby_id = s.baby_id AND db.doctor_id = s.doctor_id \
             WHERE s.doctor_id = $1 ORDER BY s.shared_at DESC, s.document_id DESC",
        )
        .bind(doctor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
