use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::models::{Baby, BabyInput};
use crate::database::ports::BabyRepository;
use crate::database::transaction::with_transaction;

const BABY_COLUMNS: &str = "baby_id, first_name, last_name, gender, birthdate, weight, height";

/// Tables holding rows keyed by `baby_id`, deleted before the baby itself
const BABY_DEPENDENT_TABLES: &[&str] = &[
    "feedingschedule",
    "growth",
    "milestones",
    "stool_entries",
    "reminders",
    "sharing_health_documents_baby_doctor",
    "doctor_baby",
    "user_baby",
];

/// Delete babies and everything hanging off them. Returns the number of `baby` rows removed.
pub(super) async fn delete_baby_rows(conn: &mut PgConnection, baby_ids: &[i32]) -> Result<u64, DatabaseError> {
    if baby_ids.is_empty() {
        return Ok(0);
    }
    for table in BABY_DEPENDENT_TABLES {
        let sql = format!("DELETE FROM {} WHERE baby_id = ANY($1)", table);
        sqlx::query(&sql).bind(baby_ids).execute(&mut *conn).await?;
    }
    let deleted = sqlx::query("DELETE FROM baby WHERE baby_id = ANY($1)")
        .bind(baby_ids)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    Ok(deleted)
}

pub struct PgBabyRepository {
    pool: PgPool,
}

impl PgBabyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BabyRepository for PgBabyRepository {
    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Baby>, DatabaseError> {
        let babies = sqlx::query_as::<_, Baby>(
            "SELECT b.baby_id, b.first_name, b.last_name, b.gender, b.birthdate, b.weight, b.height \
             FROM baby b JOIN user_baby ub ON ub.baby_id = b.baby_id \
             WHERE ub.user_id = $1 ORDER BY b.baby_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(babies)
    }

    async fn get(&self, baby_id: i32) -> Result<Option<Baby>, DatabaseError> {
        let sql = format!("SELECT {} FROM baby WHERE baby_id = $1", BABY_COLUMNS);
        let baby = sqlx::query_as::<_, Baby>(&sql)
            .bind(baby_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(baby)
    }

    async fn exists(&self, baby_id: i32) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM baby WHERE baby_id = $1)")
            .bind(baby_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn belongs_to_user(&self, baby_id: i32, user_id: i32) -> Result<bool, DatabaseError> {
        let owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM user_baby WHERE baby_id = $1 AND user_id = $2)",
        )
        .bind(baby_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(owned)
    }

    async fn create_for_user(&self, user_id: i32, input: BabyInput) -> Result<Baby, DatabaseError> {
        with_transaction(&self.pool, "create_baby", move |conn| {
            Box::pin(async move {
                let sql = format!(
                    "INSERT INTO baby (first_name, last_name, gender, birthdate, weight, height) \
                     VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
                    BABY_COLUMNS
                );
                let baby = sqlx::query_as::<_, Baby>(&sql)
                    .bind(&input.first_name)
                    .bind(&input.last_name)
                    .bind(&input.gender)
                    .bind(input.birthdate)
                    .bind(input.weight)
                    .bind(input.height)
                    .fetch_one(&mut *conn)
                    .await?;

                sqlx::query("INSERT INTO user_baby (user_id, baby_id) VALUES ($1, $2)")
                    .bind(user_id)
                    .bind(baby.baby_id)
                    .execute(&mut *conn)
                    .await?;

                Ok(baby)
            })
        })
        .await
    }

    async fn update(&self, baby_id: i32, input: BabyInput) -> Result<Option<Baby>, DatabaseError> {
        let sql = format!(
            "UPDATE baby SET first_name = $1, last_name = $2, gender = $3, birthdate = $4, \
             weight = $5, height = $6 WHERE baby_id = $7 RETURNING {}",
            BABY_COLUMNS
        );
        let baby = sqlx::query_as::<_, Baby>(&sql)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.gender)
            .bind(input.birthdate)
            .bind(input.weight)
            .bind(input.height)
            .bind(baby_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(baby)
    }

    async fn delete(&self, baby_id: i32) -> Result<bool, DatabaseError> {
        let deleted = with_transaction(&self.pool, "delete_baby", move |conn| {
            Box::pin(async move { delete_baby_rows(conn, &[baby_id]).await })
        })
        .await?;
        Ok(deleted > 0)
    }
}
