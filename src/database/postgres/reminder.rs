use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Reminder, ReminderInput};
use crate::database::ports::ReminderRepository;

const REMINDER_COLUMNS: &str = "reminder_id, baby_id, title, date, time, notes";

pub struct PgReminderRepository {
    pool: PgPool,
}

impl PgReminderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderRepository for PgReminderRepository {
    async fn list(&self, baby_id: i32) -> Result<Vec<Reminder>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM reminders WHERE baby_id = $1 ORDER BY date ASC, time ASC, reminder_id ASC",
            REMINDER_COLUMNS
        );
        let rows = sqlx::query_as::<_, Reminder>(&sql)
            .bind(baby_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create(&self, baby_id: i32, input: ReminderInput) -> Result<Reminder, DatabaseError> {
        let sql = format!(
            "INSERT INTO reminders (baby_id, title, date, time, notes) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            REMINDER_COLUMNS
        );
        let row = sqlx::query_as::<_, Reminder>(&sql)
            .bind(baby_id)
            .bind(&input.title)
            .bind(input.date)
            .bind(input.time)
            .bind(&input.notes)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(&self, baby_id: i32, id: i32, input: ReminderInput) -> Result<Option<Reminder>, DatabaseError> {
        let sql = format!(
            "UPDATE reminders SET title = $1, date = $2, time = $3, notes = $4 \
             WHERE reminder_id = $5 AND baby_id = $6 RETURNING {}",
            REMINDER_COLUMNS
        );
        let row = sqlx::query_as::<_, Reminder>(&sql)
            .bind(&input.title)
            .bind(input.date)
            .bind(input.time)
            .bind(&input.notes)
            .bind(id)
            .bind(baby_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_many(&self, baby_id: i32, ids: Vec<i32>) -> Result<Vec<i32>, DatabaseError> {
        let mut deleted: Vec<i32> = sqlx::query_scalar(
            "DELETE FROM reminders WHERE baby_id = $1 AND reminder_id = ANY($2) RETURNING reminder_id",
        )
        .bind(baby_id)
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;
        deleted.sort_unstable();
        Ok(deleted)
    }

    async fn upcoming(&self, user_id: i32, from: NaiveDate, to: NaiveDate) -> Result<Vec<Reminder>, DatabaseError> {
        let rows = sqlx::query_as::<_, Reminder>(
            "SELECT r.reminder_id, r.baby_id, r.title, r.date, r.time, r.notes \
             FROM reminders r JOIN user_baby ub ON ub.baby_id = r.baby_id \
             WHERE ub.user_id = $1 AND r.date BETWEEN $2 AND $3 \
             ORDER BY r.date ASC, r.time ASC, r.reminder_id ASC",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
