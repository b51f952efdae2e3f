use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{JournalEntry, JournalInput};
use crate::database::ports::JournalRepository;

const ENTRY_COLUMNS: &str = "entry_id, user_id, title, content, category, date, created_at, updated_at";

pub struct PgJournalRepository {
    pool: PgPool,
}

impl PgJournalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JournalRepository for PgJournalRepository {
    async fn list(&self, user_id: i32) -> Result<Vec<JournalEntry>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM journalentry WHERE user_id = $1 ORDER BY date DESC, entry_id DESC",
            ENTRY_COLUMNS
        );
        let entries = sqlx::query_as::<_, JournalEntry>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }

    async fn get(&self, entry_id: i32) -> Result<Option<JournalEntry>, DatabaseError> {
        let sql = format!("SELECT {} FROM journalentry WHERE entry_id = $1", ENTRY_COLUMNS);
        let entry = sqlx::query_as::<_, JournalEntry>(&sql)
            .bind(entry_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    async fn create(&self, user_id: i32, input: JournalInput) -> Result<JournalEntry, DatabaseError> {
        let sql = format!(
            "INSERT INTO journalentry (user_id, title, content, category, date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING {}",
            ENTRY_COLUMNS
        );
        let entry = sqlx::query_as::<_, JournalEntry>(&sql)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.category)
            .bind(input.date)
            .fetch_one(&self.pool)
            .await?;
        Ok(entry)
    }

    async fn update(&self, entry_id: i32, input: JournalInput) -> Result<Option<JournalEntry>, DatabaseError> {
        let sql = format!(
            "UPDATE journalentry SET title = $1, content = $2, category = $3, date = $4, updated_at = NOW() \
             WHERE entry_id = $5 RETURNING {}",
            ENTRY_COLUMNS
        );
        let entry = sqlx::query_as::<_, JournalEntry>(&sql)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.category)
            .bind(input.date)
            .bind(entry_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(entry)
    }

    async fn delete(&self, entry_id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM journalentry WHERE entry_id = $1")
            .bind(entry_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, entry_id: i32) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM journalentry WHERE entry_id = $1)")
            .bind(entry_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn belongs_to_user(&self, entry_id: i32, user_id: i32) -> Result<bool, DatabaseError> {
        let owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM journalentry WHERE entry_id = $1 AND user_id = $2)",
        )
        .bind(entry_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(owned)
    }
}
