use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use super::like_pattern;
use crate::database::manager::DatabaseError;
use crate::database::models::{Coupon, CuratedTip, QuizQuestion, TipFilter};
use crate::database::ports::LookupRepository;

/// Read-only coupon, quiz and tip tables
pub struct PgLookupRepository {
    pool: PgPool,
}

impl PgLookupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LookupRepository for PgLookupRepository {
    async fn active_coupons(&self, today: NaiveDate) -> Result<Vec<Coupon>, DatabaseError> {
        let coupons = sqlx::query_as::<_, Coupon>(
            "SELECT coupon_id, code, description, discount, expiration_date FROM coupons \
             WHERE expiration_date IS NULL OR expiration_date >= $1 \
             ORDER BY expiration_date ASC NULLS LAST, coupon_id ASC",
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;
        Ok(coupons)
    }

    async fn quiz_questions(&self, limit: i64) -> Result<Vec<QuizQuestion>, DatabaseError> {
        let questions = sqlx::query_as::<_, QuizQuestion>(
            "SELECT question_id, question, options, answer, explanation FROM quizquestions \
             ORDER BY RANDOM() LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    async fn tips(&self, filter: TipFilter) -> Result<Vec<CuratedTip>, DatabaseError> {
        let search = filter.search.as_deref().map(like_pattern);
        let tips = sqlx::query_as::<_, CuratedTip>(
            "SELECT tip_id, title, content, category FROM curatedtips \
             WHERE ($1::text IS NULL OR LOWER(category) = LOWER($1)) \
             AND ($2::text IS NULL OR title ILIKE $2 OR content ILIKE $2) \
             ORDER BY tip_id ASC",
        )
        .bind(&filter.category)
        .bind(&search)
        .fetch_all(&self.pool)
        .await?;
        Ok(tips)
    }
}
