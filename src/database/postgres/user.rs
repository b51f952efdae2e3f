use async_trait::async_trait;
use sqlx::PgPool;

use super::baby::delete_baby_rows;
use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, ProfileImage, User, UserUpdate};
use crate::database::ports::UserRepository;
use crate::database::transaction::with_transaction;

const USER_COLUMNS: &str = "user_id, email, first_name, last_name, role, created_at";

pub(crate) const DUPLICATE_EMAIL: &str = "A user with this email already exists";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_user_id_by_email(&self, email: &str) -> Result<Option<i32>, DatabaseError> {
        let id = sqlx::query_scalar::<_, i32>("SELECT user_id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    async fn get_user(&self, user_id: i32) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE user_id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, input: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (email, first_name, last_name, role, created_at) \
             VALUES ($1, $2, $3, $4, NOW()) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    DatabaseError::Conflict(DUPLICATE_EMAIL.to_string())
                }
                other => other.into(),
            })?;
        Ok(user)
    }

    async fn update_user(&self, user_id: i32, input: UserUpdate) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET first_name = $1, last_name = $2 WHERE user_id = $3 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, user_id: i32) -> Result<bool, DatabaseError> {
        with_transaction(&self.pool, "delete_user", move |conn| {
            Box::pin(async move {
                let baby_ids: Vec<i32> =
                    sqlx::query_scalar("SELECT baby_id FROM user_baby WHERE user_id = $1")
                        .bind(user_id)
                        .fetch_all(&mut *conn)
                        .await?;

                sqlx::query("DELETE FROM user_baby WHERE user_id = $1")
                    .bind(user_id)
                    .execute(&mut *conn)
                    .await?;

                // Babies still linked to another parent survive
                let orphaned: Vec<i32> = sqlx::query_scalar(
                    "SELECT b FROM UNNEST($1::int[]) AS b \
                     WHERE NOT EXISTS (SELECT 1 FROM user_baby ub WHERE ub.baby_id = b)",
                )
                .bind(&baby_ids)
                .fetch_all(&mut *conn)
                .await?;
                delete_baby_rows(&mut *conn, &orphaned).await?;

                let statements = [
                    "DELETE FROM forumreply WHERE user_id = $1 \
                     OR post_id IN (SELECT post_id FROM forumpost WHERE user_id = $1)",
                    "DELETE FROM forumpost WHERE user_id = $1",
                    "DELETE FROM journalentry WHERE user_id = $1",
                    "DELETE FROM exporteddocument WHERE user_id = $1",
                    "DELETE FROM profile_images WHERE user_id = $1",
                    "DELETE FROM sharing_health_documents_baby_doctor WHERE doctor_id = $1 OR shared_by = $1",
                    "DELETE FROM doctor_baby WHERE doctor_id = $1",
                ];
                for sql in statements {
                    sqlx::query(sql).bind(user_id).execute(&mut *conn).await?;
                }

                let deleted = sqlx::query("DELETE FROM users WHERE user_id = $1")
                    .bind(user_id)
                    .execute(&mut *conn)
                    .await?
                    .rows_affected();
                Ok(deleted > 0)
            })
        })
        .await
    }

    async fn list_doctors(&self) -> Result<Vec<User>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM users WHERE role = 'doctor' ORDER BY last_name, first_name, user_id",
            USER_COLUMNS
        );
        let doctors = sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await?;
        Ok(doctors)
    }

    async fn get_profile_image(&self, user_id: i32) -> Result<Option<ProfileImage>, DatabaseError> {
        let image = sqlx::query_as::<_, ProfileImage>(
            "SELECT user_id, image_url, updated_at FROM profile_images WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(image)
    }

    async fn upsert_profile_image(&self, user_id: i32, image_url: String) -> Result<ProfileImage, DatabaseError> {
        let image = sqlx::query_as::<_, ProfileImage>(
            "INSERT INTO profile_images (user_id, image_url, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (user_id) DO UPDATE SET image_url = EXCLUDED.image_url, updated_at = NOW() \
             RETURNING user_id, image_url, updated_at",
        )
        .bind(user_id)
        .bind(&image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(image)
    }
}
