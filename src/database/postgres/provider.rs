//! Childcare-provider directory. Runs against the provider database pool.

use async_trait::async_trait;
use sqlx::PgPool;

use super::like_pattern;
use crate::database::manager::DatabaseError;
use crate::database::models::{ChildProvider, FavoriteProvider, ProviderFilter};
use crate::database::ports::ProviderRepository;
use crate::database::transaction::with_transaction;

pub struct PgProviderRepository {
    pool: PgPool,
}

impl PgProviderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProviderRepository for PgProviderRepository {
    async fn list(&self, filter: ProviderFilter) -> Result<Vec<ChildProvider>, DatabaseError> {
        let search = filter.search.as_deref().map(like_pattern);
        let providers = sqlx::query_as::<_, ChildProvider>(
            "SELECT provider_id, name, address, city, phone, email, capacity, ages_served \
             FROM child_providers \
             WHERE ($1::text IS NULL OR LOWER(city) = LOWER($1)) \
             AND ($2::text IS NULL OR name ILIKE $2 OR address ILIKE $2) \
             ORDER BY name ASC, provider_id ASC",
        )
        .bind(&filter.city)
        .bind(&search)
        .fetch_all(&self.pool)
        .await?;
        Ok(providers)
    }

    async fn exists(&self, provider_id: i32) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM child_providers WHERE provider_id = $1)",
        )
        .bind(provider_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn favorites(&self, user_id: i32) -> Result<Vec<FavoriteProvider>, DatabaseError> {
        let favorites = sqlx::query_as::<_, FavoriteProvider>(
            "SELECT p.provider_id, p.name, p.address, p.city, p.phone, p.email, p.capacity, \
             p.ages_served, f.created_at AS favorited_at \
             FROM user_favorite_providers f JOIN child_providers p ON p.provider_id = f.provider_id \
             WHERE f.user_id = $1 ORDER BY f.created_at DESC, p.provider_id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(favorites)
    }

    async fn toggle_favorite(&self, user_id: i32, provider_id: i32) -> Result<bool, DatabaseError> {
        with_transaction(&self.pool, "toggle_favorite", move |conn| {
            Box::pin(async move {
                let removed = sqlx::query(
                    "DELETE FROM user_favorite_providers WHERE user_id = $1 AND provider_id = $2",
                )
                .bind(user_id)
                .bind(provider_id)
                .execute(&mut *conn)
                .await?
                .rows_affected();

                if removed > 0 {
                    return Ok(false);
                }

                sqlx::query(
                    "INSERT INTO user_favorite_providers (user_id, provider_id, created_at) \
                     VALUES ($1, $2, NOW())",
                )
                .bind(user_id)
                .bind(provider_id)
                .execute(&mut *conn)
                .await?;
                Ok(true)
            })
        })
        .await
    }

    async fn clear_favorites(&self, user_id: i32) -> Result<u64, DatabaseError> {
        let removed = sqlx::query("DELETE FROM user_favorite_providers WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(removed)
    }
}
